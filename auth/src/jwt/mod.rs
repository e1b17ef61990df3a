pub mod claims;
pub mod clock;
pub mod codec;
pub mod errors;
pub mod key;

pub use claims::Claims;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use codec::TokenCodec;
pub use errors::SigningKeyError;
pub use errors::TokenError;
pub use key::SigningKey;
