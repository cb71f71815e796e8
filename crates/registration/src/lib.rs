//! Registration form engine: per-field validators, the submit gate, the
//! submit-time validation pipeline, the submission controller and its two
//! notification channels.

pub mod controller;
pub mod errors;
pub mod file_store;
pub mod form;
pub mod gate;
pub mod notify;
pub mod pipeline;
pub mod store;
pub mod validators;

pub use controller::{
    FormSettings, STORAGE_FAILURE_MESSAGE, SUCCESS_MESSAGE, SubmissionController, SubmitOutcome,
};
pub use errors::{StoreError, ValidationError};
pub use file_store::JsonFileStore;
pub use form::{Field, FieldFlags, FormRecord, FormState};
pub use gate::{FormView, display_errors, is_submit_disabled};
pub use notify::{
    ChannelKind, DismissReason, Notification, NotificationChannel, NotificationSettings,
    Notifications,
};
pub use pipeline::{ValidationPipeline, ValidationRule};
pub use store::{DEFAULT_STORAGE_KEY, MemoryStore, RecordStore, load_record, save_record};
