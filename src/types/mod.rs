// ABOUTME: Validated domain types shared by the upload pipeline and its collaborators.
// ABOUTME: Uses phantom types so version and upload endpoints cannot be swapped.

mod digest;
mod id;
mod site_name;
mod token;

pub use digest::{Digest, ParseDigestError};
pub use id::{Endpoint, UploadBase, VersionHandle};
pub use site_name::{SiteName, SiteNameError};
pub use token::BearerToken;
