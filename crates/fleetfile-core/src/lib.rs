pub mod codec;
pub mod error;
pub mod key;
pub mod schema;
pub mod value;

pub use codec::{BincodeCodec, ValueCodec};
pub use error::{Error, Result};
pub use key::{Key, KeyIndex};
pub use schema::{Field, FieldType, Schema};
pub use value::{Record, Value};
