pub mod error;
pub mod extract;
pub mod validated_json;
