//! Fragment-ion annotation and PTM-site localization scoring for peptide
//! MS/MS spectra: theoretical ion ladders, indexed peak matching, reporter
//! ions and a binomial A-score engine.

pub mod chemistry;
pub mod localization;
pub mod ms;
pub mod msms;
pub mod stats;

pub use chemistry::model::{
    AminoAcidResidue, Modification, ModificationMatch, ModificationTable, Peptide, PtmLocation,
    SequenceMatchingRule,
};
pub use chemistry::table::{AminoAcidTable, STANDARD_AMINO_ACID_TABLE};
pub use localization::ascore::AScoreEngine;
pub use ms::spectrum::SpectrumIndex;
pub use ms::utils::MassTolUnit;
pub use msms::annotator::{
    annotate_peptide, FragmentAnnotator, PeptideAnnotation, ReporterIonAnnotator, TheoreticalIon,
};
pub use msms::fragmentation::{series_pair, SeriesPair};
pub use msms::model::{
    FragmentIonSeries, IonKind, IonMatch, IsobaricTag, NeutralLoss, ReporterIon,
};
pub use msms::neutral_loss::NeutralLossesMap;
pub use msms::params::{AnnotationParameters, SeriesSelection, SpecificAnnotationParameters};
pub use stats::binomial::MathContext;
