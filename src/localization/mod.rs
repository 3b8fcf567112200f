pub mod ascore;
