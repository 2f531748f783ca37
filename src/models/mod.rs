// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AnalysisMetrics, AnalysisResult, Attachment, Template, Upload, UploadedTable};
pub use requests::{DocumentRequest, GridUpload, TemplateDraft};
pub use responses::{ErrorResponse, HeadersResponse, HealthResponse};
