use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum InputError {
    #[error("Invalid input repository {0:?}. Expected format {{owner}}/{{repo}}")]
    Repository(String),
    #[error("Invalid input ref {0:?}")]
    Ref(String),
    #[error("Invalid input regex {0:?}: {1}")]
    Regex(String, String),
    #[error("Invalid input {name}: {value:?}. Supported boolean values: \
             true | True | TRUE | false | False | FALSE")]
    Boolean {
        name: &'static str,
        value: String,
    },
}
