
use ptm_annotator_rs::*;

fn mod_table() -> ModificationTable {
    ModificationTable::new(vec![
        Modification::new("Phospho-S", Some("p"), 79.96633052075, PtmLocation::ANYWHERE, Some('S')).unwrap(),
    ]).unwrap()
}

fn by_params(precursor_charge: i8) -> SpecificAnnotationParameters {
    use FragmentIonSeries::{b, y};
    let fragment_charges: Vec<i8> = (1..precursor_charge).collect();
    SpecificAnnotationParameters::new(
        precursor_charge,
        vec![b, y],
        fragment_charges,
        NeutralLossesMap::new(),
        0.02,
        MassTolUnit::Da,
    ).unwrap()
}

// A length-10 peptide whose spectrum contains exactly the theoretical b3
// and y7 peaks (complementary ions of the same cleavage) must yield
// exactly two matches, numbered b3 and y7.
#[test]
fn complementary_b3_y7_pair_yields_exactly_two_matches() {
    let peptide = Peptide::new("ACDEFGHIKL", vec![]).unwrap();
    let params = by_params(2);

    // A+C+D + proton / E..L + water + proton
    let b3_mz = 290.0805179;
    let y7_mz = 843.4713152;
    let index = SpectrumIndex::new(vec![b3_mz, y7_mz], vec![100.0, 100.0]).unwrap();

    let annotation = annotate_peptide(
        &peptide, &[], &index, &params, &STANDARD_AMINO_ACID_TABLE, &mod_table(),
    ).unwrap();

    assert_eq!(annotation.matches.len(), 2);

    let labels: Vec<String> = annotation.matches.iter().map(|m| m.ion.label()).collect();
    assert!(labels.contains(&"b3".to_string()), "got {:?}", labels);
    assert!(labels.contains(&"y7".to_string()), "got {:?}", labels);

    for ion_match in &annotation.matches {
        assert_eq!(ion_match.charge, 1);
        assert!(ion_match.mz_error().abs() <= 0.02);
    }
}

// Forward plus complementary ion m/z at the same ladder position must sum
// to peptide mass + 2 protons for the b/y pair, at every position.
#[test]
fn by_ladders_satisfy_the_complementarity_invariant() {
    let table = mod_table();
    let peptide = Peptide::new("TESTKCTESCTK", vec![]).unwrap();

    let selection = SeriesSelection {
        pair: series_pair(FragmentIonSeries::b).unwrap(),
        compute_forward: true,
        compute_complementary: true,
    };
    let annotator = FragmentAnnotator::new(
        &peptide, &[], selection, &STANDARD_AMINO_ACID_TABLE, &table,
    ).unwrap();

    let peptide_mass = peptide.mono_mass(&STANDARD_AMINO_ACID_TABLE, &table).unwrap();
    let expected_total = peptide_mass + 2.0 * 1.007276466812;

    for i in 0..annotator.forward_mz_ladder().len() {
        let total = annotator.forward_mz_ladder()[i] + annotator.complementary_mz_ladder()[i];
        assert!((total - expected_total).abs() < 1e-9);
    }
}

// TESTKCTESCTK carries a phosphorylation on each of its serines: the
// number of possible sites equals the number of occurrences, so every
// site is certain and scores 100 with no spectrum matching at all.
#[test]
fn phospho_sites_equal_occurrences_all_score_100() {
    let table = mod_table();
    let peptide = Peptide::new("TESTKCTESCTK", vec![
        ModificationMatch::new("Phospho-S", 3),
        ModificationMatch::new("Phospho-S", 9),
    ]).unwrap();

    let phospho = table.get("Phospho-S").unwrap().clone();
    let index = SpectrumIndex::new(vec![], vec![]).unwrap();

    let engine = AScoreEngine::new(&STANDARD_AMINO_ACID_TABLE, &table, MathContext::default());
    let scores = engine.estimate(
        &peptide, &[phospho], &index, &by_params(2), false, SequenceMatchingRule::CHAR_IDENTICAL,
    ).unwrap();

    assert_eq!(scores.len(), 2);
    assert_eq!(scores[&3], 100.0);
    assert_eq!(scores[&9], 100.0);
}

// Two reporter ions against a spectrum holding one matching and one
// non-matching peak: exactly one match.
#[test]
fn reporter_annotation_matches_only_peaks_in_tolerance() {
    let tmt6 = IsobaricTag::Tmt6.reporter_ions();
    let annotator = ReporterIonAnnotator::new(&tmt6[0..2]);

    let index = SpectrumIndex::new(vec![126.1278, 300.0], vec![500.0, 80.0]).unwrap();
    let matches = annotator.get_ion_matches(&index, &by_params(2));

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].ion.label(), "TMT126");
    assert_eq!(matches[0].charge, 1);
}

// A spectrum supporting one of two candidate serines must localize the
// phosphorylation there and report the alternative as indistinguishable
// from nothing (score 0).
#[test]
fn ascore_localizes_to_the_supported_serine() {
    let table = mod_table();
    let peptide = Peptide::new("ASAAASAA", vec![ModificationMatch::new("Phospho-S", 2)]).unwrap();
    let params = by_params(2);

    let selection = SeriesSelection {
        pair: series_pair(FragmentIonSeries::b).unwrap(),
        compute_forward: true,
        compute_complementary: true,
    };
    let annotator = FragmentAnnotator::new(
        &peptide, &[], selection, &STANDARD_AMINO_ACID_TABLE, &table,
    ).unwrap();

    // the b3..b5 ions carry the +80 shift only when the phospho sits on
    // serine 2; a site-6 form would leave them unshifted
    let index = SpectrumIndex::new(
        vec![
            annotator.forward_mz_ladder()[2],
            annotator.forward_mz_ladder()[3],
            annotator.forward_mz_ladder()[4],
        ],
        vec![120.0, 100.0, 80.0],
    ).unwrap();

    let phospho = table.get("Phospho-S").unwrap().clone();
    let engine = AScoreEngine::new(&STANDARD_AMINO_ACID_TABLE, &table, MathContext::default());
    let scores = engine.estimate(
        &peptide, &[phospho], &index, &params, false, SequenceMatchingRule::CHAR_IDENTICAL,
    ).unwrap();

    assert_eq!(scores.len(), 2);
    assert!(scores[&2] > 0.0);
    assert_eq!(scores[&6], 0.0);
}
