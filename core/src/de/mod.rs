pub mod value;

pub use value::from_value;
