//! Directive construction and rendering.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::RequestKind;
use crate::format::to_spaced_json;

/// Client router entry point invoked by every directive.
const ENTRY_POINT: &str = "loadPage";

/// Template rendered for error directives.
pub const ERROR_TEMPLATE: &str = "error.html";
/// Title used for error directives.
pub const ERROR_TITLE: &str = "ERROR";
/// Element the error page is loaded into.
pub const ERROR_CONTAINER_ID: &str = "mainServerBody";
/// Route the client shows while an error page is displayed.
pub const ERROR_ROUTE: &str = "https://sparkleweb.vercel.app/error";

/// Error building a directive from template data.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// Required field absent or null.
    #[error("{kind} directive requires `{field}`")]
    MissingField {
        /// Directive kind.
        kind: &'static str,
        /// Missing field name.
        field: &'static str,
    },
    /// Field present with the wrong JSON type.
    #[error("`{field}` must be {expected}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Expected shape, e.g. "a string".
        expected: &'static str,
    },
    /// Payload could not be serialized.
    #[error("failed to serialize directive: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Navigation target shared by page and section directives.
#[derive(Clone, Debug, PartialEq)]
pub struct Navigation {
    /// Template identifier to render.
    pub template: String,
    /// Document title after navigation.
    pub title: String,
    /// Template arguments.
    pub args: Map<String, Value>,
    /// Names of assets that need a full reload.
    pub reload: Vec<String>,
}

/// A call the client router must execute.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// Load a page into the main view.
    Page(Navigation),
    /// Load a fragment into the element `target_id`.
    Section {
        /// What to load.
        navigation: Navigation,
        /// Element receiving the fragment.
        target_id: String,
    },
    /// Show the error page with a message.
    Error {
        /// Message passed to the error template.
        message: String,
    },
    /// Show the error page for an unknown directive kind.
    InvalidKind {
        /// The kind that was asked for.
        kind: String,
    },
}

/// Request object as the client router sends it to the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Invocation<'a> {
    request: &'a str,
    template: &'a str,
    title: &'a str,
    args: &'a Map<String, Value>,
    reload_required: &'a [String],
}

/// Section request object; the client expects `title` ahead of `template`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionInvocation<'a> {
    request: &'a str,
    title: &'a str,
    template: &'a str,
    args: &'a Map<String, Value>,
    reload_required: &'a [String],
}

impl Directive {
    /// Build a directive of `kind` from keyword data.
    ///
    /// Recognized kinds are `page`, `section` and `error`; any other kind yields
    /// [`Directive::InvalidKind`] instead of an error.
    pub fn from_data(kind: &str, data: &Map<String, Value>) -> Result<Self, DirectiveError> {
        match kind {
            "page" => Ok(Self::Page(Navigation::from_data("page", data)?)),
            "section" => Ok(Self::Section {
                navigation: Navigation::from_data("section", data)?,
                target_id: required_str("section", data, "target_id")?,
            }),
            "error" => Ok(Self::Error {
                message: required_str("error", data, "error")?,
            }),
            other => Ok(Self::InvalidKind {
                kind: other.to_owned(),
            }),
        }
    }

    /// Render the directive as a client router call.
    pub fn render(&self) -> Result<String, DirectiveError> {
        match self {
            Self::Page(nav) => {
                let payload = nav.page_invocation();
                Ok(format!("{ENTRY_POINT}({})", to_spaced_json(&payload)?))
            }
            Self::Section {
                navigation,
                target_id,
            } => {
                let payload = navigation.section_invocation();
                Ok(format!(
                    "{ENTRY_POINT}({}, {})",
                    to_spaced_json(&payload)?,
                    to_spaced_json(target_id)?
                ))
            }
            Self::Error { message } => error_call(message),
            Self::InvalidKind { kind } => error_call(&format!(
                "Invalid Request Type :- request type must be page or section not {kind}"
            )),
        }
    }
}

impl Navigation {
    fn from_data(kind: &'static str, data: &Map<String, Value>) -> Result<Self, DirectiveError> {
        let args = match data.get("args") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(args)) => args.clone(),
            Some(_) => {
                return Err(DirectiveError::InvalidField {
                    field: "args",
                    expected: "an object",
                });
            }
        };
        let reload = match data.get("reload") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_owned)
                        .ok_or(DirectiveError::InvalidField {
                            field: "reload",
                            expected: "an array of strings",
                        })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(DirectiveError::InvalidField {
                    field: "reload",
                    expected: "an array of strings",
                });
            }
        };

        Ok(Self {
            template: required_str(kind, data, "template")?,
            title: required_str(kind, data, "title")?,
            args,
            reload,
        })
    }

    fn page_invocation(&self) -> Invocation<'_> {
        Invocation {
            request: RequestKind::Page.as_str(),
            template: &self.template,
            title: &self.title,
            args: &self.args,
            reload_required: &self.reload,
        }
    }

    fn section_invocation(&self) -> SectionInvocation<'_> {
        SectionInvocation {
            request: RequestKind::Section.as_str(),
            title: &self.title,
            template: &self.template,
            args: &self.args,
            reload_required: &self.reload,
        }
    }
}

/// Build the directive string for `kind` from keyword data.
///
/// Shorthand for [`Directive::from_data`] followed by [`Directive::render`].
pub fn directive(kind: &str, data: &Map<String, Value>) -> Result<String, DirectiveError> {
    Directive::from_data(kind, data)?.render()
}

/// Error pages are loaded as ordinary pages into the fixed container.
fn error_call(message: &str) -> Result<String, DirectiveError> {
    let mut args = Map::new();
    args.insert("error".to_owned(), Value::String(message.to_owned()));
    let payload = Invocation {
        request: RequestKind::Page.as_str(),
        template: ERROR_TEMPLATE,
        title: ERROR_TITLE,
        args: &args,
        reload_required: &[],
    };
    Ok(format!(
        "{ENTRY_POINT}({}, {}, {})",
        to_spaced_json(&payload)?,
        to_spaced_json(ERROR_CONTAINER_ID)?,
        to_spaced_json(ERROR_ROUTE)?
    ))
}

fn required_str(
    kind: &'static str,
    data: &Map<String, Value>,
    field: &'static str,
) -> Result<String, DirectiveError> {
    match data.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        None | Some(Value::Null) => Err(DirectiveError::MissingField { kind, field }),
        Some(_) => Err(DirectiveError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}
