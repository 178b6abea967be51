use nalgebra::RealField;

/// The base trait for [`Function`](super::function::Function).
pub trait Problem {
    /// Type of the field, usually f64 or f32.
    type Field: RealField + Copy;
}
