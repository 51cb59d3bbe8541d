pub mod entry;
pub mod interpreter;
pub mod parser;
pub mod runtime;
pub mod types;

pub use entry::{Entry, EntryBody, Expression, create_entries, create_entry};
pub use interpreter::{
    ErrorKind, EvalContext, EvalError, MAX_PLACEABLE_LENGTH, MAX_PLACEABLES, compute_suggestions,
    format_entry, plural_category,
};
pub use parser::{ParseError, ParserRegistry, ResourceParser};
pub use runtime::{
    Context, ContextError, Diagnostic, EntityTranslation, Env, FetchError, LoadError,
    ReadyState, ResourceFetcher, Translation,
};
pub use types::{Direction, Language, Value};

/// Creates a `HashMap<String, Value>` of resolution arguments.
///
/// Values are converted via `Into<Value>`, so integers, floats and strings
/// can be passed directly.
///
/// # Example
///
/// ```
/// use lexis::{args, Value};
///
/// let a = args! { "n" => 3, "user" => "Alice" };
/// assert_eq!(a.len(), 2);
/// assert_eq!(a["n"], Value::Number(3));
/// assert_eq!(a["user"].as_string(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! args {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
