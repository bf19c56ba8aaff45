//! Core library for turning a CSV contact list into scannable vCard
//! QR codes plus a browsable HTML index.

mod batch;
mod contact;
mod page;
mod qr;

pub use batch::{run, BatchConfig, FailureKind, RowFailure, RunSummary};
pub use contact::{CardError, ContactCard, ContactRow, PRODID};
pub use page::IndexPage;
pub use qr::{render_qr_image, EccLevel, QrError};
