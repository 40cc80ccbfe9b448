pub mod extract;
pub mod local;
pub mod signal;
pub mod verify;

pub use signal::{build_contact_signal, ContactSignal};
pub use verify::{
    EmailVerification, IpVerification, PhoneVerification, VerificationSource, VerifyClient,
};
