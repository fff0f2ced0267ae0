pub use self::{field::*, shape_matrix::*};

pub(crate) mod field;
pub(crate) mod shape_matrix;
