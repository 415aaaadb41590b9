pub mod draft;
pub mod favorites;
pub mod places;

use crate::{entities::FieldKey, error::Error};

fn field_key(raw: &str) -> Result<FieldKey, Error> {
    raw.parse()
}
