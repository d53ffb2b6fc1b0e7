//! Bundled responders: small, network-free domains layered over the
//! pipeline the way bot plugins layer over a shared base.

pub mod lorem;
pub mod mailto;

pub use lorem::LoremResponder;
pub use mailto::MailtoResponder;
