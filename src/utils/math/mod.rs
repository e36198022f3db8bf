pub mod fixed;
pub mod vector;

pub use fixed::FixedVector;
pub use vector::SparseVector;
