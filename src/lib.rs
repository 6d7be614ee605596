pub mod artist;
pub mod dispatch;
pub mod error;
pub mod form;
pub mod multiselect;
pub mod output_record;
pub mod page;
pub mod search;
pub mod show;
pub mod venue;

pub use dispatch::{Attempt, Delivery, Dispatcher, HttpTransport, Outcome, Response, Transport};
pub use error::DispatchError;
pub use form::{DeletePayload, FormKind, Request, Resource, Submission};
pub use page::Page;
