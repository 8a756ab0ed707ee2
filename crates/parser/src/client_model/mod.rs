//! Client model document parser
//!
//! Parses client model documents (JSON or YAML) into the ClientModel IR.
//!
//! ## Document shape
//! ```yaml
//! provider: Microsoft.Foo
//! package: com.azure.resourcemanager.foo
//! resources:
//!   - model: ParentInner
//!     create:
//!       path: /subscriptions/{subscriptionId}/providers/Microsoft.Foo/parents/{parentName}
//! models:
//!   - name: ParentInner
//!     properties:
//!       - name: location
//!         type: string
//!         required: true
//!       - name: properties
//!         type: ParentProperties
//!         flatten: true
//!   - name: SkuName
//!     enum: [Standard_LRS, Premium_LRS]
//! ```
//!
//! Property types are expressions understood by [`crate::TypeMapper`]
//! (`list<T>`, `map<string, T>`, `T[]`, builtin names, model names) or
//! structured `{name, package}` references to external types.

mod converter;
mod parser;
mod types;

pub use parser::{ClientModelParser, DocumentFormat};
pub use types::*;
