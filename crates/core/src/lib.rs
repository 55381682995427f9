//! Strategy lookup for the 八雀 card tally. Keep this crate free of IO and
//! platform concerns.

pub mod cards;
pub mod knowledge;
pub mod numerals;
pub mod phrase;
pub mod resolver;
pub mod rules;
pub mod sequence;

pub use cards::*;
pub use knowledge::*;
pub use numerals::*;
pub use phrase::*;
pub use resolver::*;
pub use rules::*;
pub use sequence::*;
