//! gopass-secret
//!
//! A KRM function for kustomize pipelines. It selects core `v1` Secrets from
//! the resource stream, strips the `config.kubernetes.io/local-config` and
//! `config.kubernetes.io/function` annotations, and replaces every
//! `gopass:<path>` value in `data` / `stringData` with the secret gopass
//! returns for `<path>` (base64-encoded for `data`).
//!
//! ```rust,ignore
//! use gopass_secret::{GopassSecretFunction, MemoryProvider, ResourceStream};
//!
//! let provider = MemoryProvider::new().with_secret("app/db", "hunter2");
//! let function = GopassSecretFunction::new(Arc::new(provider));
//!
//! let mut stream = ResourceStream::parse(input)?;
//! function.process(&mut stream.items).await?;
//! println!("{}", stream.to_yaml()?);
//! ```

pub mod annotations;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod function;
pub mod logging;
pub mod policy;
pub mod provider;
pub mod resolver;
pub mod selector;
pub mod stream;

pub use annotations::AnnotationCleaner;
pub use document::{Document, NodeKind};
pub use error::{AnnotationEditError, FunctionError, ResolveError};
pub use function::{GopassSecretFunction, ProcessSummary};
pub use policy::{Encoding, FieldPolicy, SECRET_FIELD_POLICIES};
pub use provider::{GopassProvider, MemoryProvider, ProviderError, SecretProvider};
pub use resolver::{SecretResolver, GOPASS_PREFIX};
pub use selector::SecretSelector;
pub use stream::{ResourceStream, StreamError};
