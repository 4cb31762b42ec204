pub mod value;

pub use value::to_value;
