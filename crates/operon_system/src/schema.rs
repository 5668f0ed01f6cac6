//! Property schema: the typed-input collaborator consumed at construction.
//!
//! Construction of an [`Instance`](crate::action::Instance) validates the
//! supplied [`Inputs`] in two steps:
//!
//! 1. [`Schema::resolve`] checks structure — required fields, defaults,
//!    positional mapping, unknown names — and produces a filled argument
//!    object;
//! 2. serde deserialization into [`Action::Props`](crate::action::Action)
//!    performs the typed coercion and rejects mismatched values.
//!
//! Both steps run *before* any hook executes and before the metadata
//! snapshot is populated; a [`ValidationError`] here is fatal and cannot be
//! recovered by hooks. The type-checking algorithm itself belongs to serde;
//! this module only supplies the structural contract around it.
//!
//! A declared (non-empty) schema rejects unknown argument names. The
//! default empty schema is pass-through: arguments go straight to serde,
//! which ignores undeclared fields.

use hashbrown::HashMap;
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// The argument mapping supplied to construction.
///
/// Arguments are named by default; [`Inputs::arg`] appends a positional
/// value, mapped to positional-declared schema fields in declaration order.
///
/// # Example
///
/// ```
/// use operon_system::schema::Inputs;
///
/// let inputs = Inputs::new()
///     .with("name", "Alice")
///     .with("retries", 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub(crate) named: Map<String, Value>,
    pub(crate) positional: Vec<Value>,
}

impl Inputs {
    /// Creates an empty argument mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named argument.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }
}

impl From<Map<String, Value>> for Inputs {
    fn from(named: Map<String, Value>) -> Self {
        Self {
            named,
            positional: Vec::new(),
        }
    }
}

/// Empty property set for actions that take no inputs.
///
/// Deserializes from an empty (or any) argument object, unlike the unit
/// type which serde only accepts from `null`.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct NoProps {}

// ─────────────────────────────────────────────────────────────────────────────
// Field / Schema
// ─────────────────────────────────────────────────────────────────────────────

/// A single declared input.
///
/// A field with no default is required; [`Field::optional`] opts out
/// (leaving absence to the serde side, e.g. an `Option<T>` property).
#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    required: bool,
    default: Option<Value>,
    positional: bool,
}

impl Field {
    /// Declares a required named field.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            default: None,
            positional: false,
        }
    }

    /// Supplies a default, making the field optional.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    /// Marks the field optional without a default.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Allows the field to be supplied positionally.
    #[must_use]
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The declared input structure of an action type.
///
/// # Example
///
/// ```
/// use operon_system::schema::{Field, Schema};
///
/// let schema = Schema::new()
///     .field(Field::new("name").positional())
///     .field(Field::new("greeting").default("Hello"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    index: HashMap<&'static str, usize>,
}

impl Schema {
    /// Creates an empty, pass-through schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same name is already declared.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        assert!(
            !self.index.contains_key(field.name),
            "field '{}' is already declared",
            field.name
        );
        self.index.insert(field.name, self.fields.len());
        self.fields.push(field);
        self
    }

    /// Returns true if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolves supplied inputs into a filled argument object.
    ///
    /// Maps positional values onto positional-declared fields in
    /// declaration order, applies defaults, and checks required and
    /// unknown names. An empty schema passes named arguments through
    /// untouched (and accepts no positional values).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first structural
    /// problem found.
    pub fn resolve(&self, inputs: Inputs) -> Result<Map<String, Value>, ValidationError> {
        let Inputs {
            mut named,
            positional,
        } = inputs;

        let slots: Vec<&Field> = self.fields.iter().filter(|f| f.positional).collect();
        if positional.len() > slots.len() {
            return Err(ValidationError::Surplus {
                given: positional.len(),
                expected: slots.len(),
            });
        }
        for (value, field) in positional.into_iter().zip(&slots) {
            if named.contains_key(field.name) {
                return Err(ValidationError::Duplicate { field: field.name });
            }
            named.insert(field.name.to_string(), value);
        }

        if self.fields.is_empty() {
            return Ok(named);
        }

        for name in named.keys() {
            if !self.index.contains_key(name.as_str()) {
                return Err(ValidationError::Unknown { name: name.clone() });
            }
        }

        for field in &self.fields {
            if named.contains_key(field.name) {
                continue;
            }
            match &field.default {
                Some(default) => {
                    named.insert(field.name.to_string(), default.clone());
                }
                None if field.required => {
                    return Err(ValidationError::Missing { field: field.name });
                }
                None => {}
            }
        }

        Ok(named)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ValidationError
// ─────────────────────────────────────────────────────────────────────────────

/// Construction-time validation failure.
///
/// Fatal: construction never completes, no hook runs, and the metadata
/// snapshot is never populated.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A required field was not supplied.
    #[error("missing required input '{field}'")]
    Missing {
        /// The declared field name.
        field: &'static str,
    },

    /// An argument name does not match any declared field.
    #[error("unknown input '{name}'")]
    Unknown {
        /// The supplied argument name.
        name: String,
    },

    /// A field was supplied both positionally and by name.
    #[error("input '{field}' supplied both positionally and by name")]
    Duplicate {
        /// The declared field name.
        field: &'static str,
    },

    /// More positional values than positional-declared fields.
    #[error("{given} positional inputs supplied, schema declares {expected}")]
    Surplus {
        /// Number of positional values supplied.
        given: usize,
        /// Number of positional fields declared.
        expected: usize,
    },

    /// Typed coercion of the resolved arguments failed.
    #[error("input coercion failed: {source}")]
    Coerce {
        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// The validated properties could not be serialized into the metadata
    /// snapshot.
    #[error("property serialization failed: {source}")]
    Serialize {
        /// The underlying serde error.
        source: serde_json::Error,
    },
}
