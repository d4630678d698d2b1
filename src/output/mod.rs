//! Output backends for reconstructed drawings.

pub mod svg;
