pub mod autocomplete;
pub mod cli;
pub mod completion;
pub mod config;
pub mod console;
pub mod dom;
pub mod events;
pub mod format;
pub mod input;
pub mod matcher;
pub mod menu;
pub mod query;
pub mod store;
pub mod surface;

pub use autocomplete::Autocomplete;
pub use completion::{CompletionSource, SourceDispatcher, WordListSource};
pub use config::{AutocompleteConfig, ConfigError, ConfigResult};
pub use console::{Console, VerbosityLevel, console, init_console};
pub use events::CompleteEvent;
pub use format::{OptionFormatter, PlainFormatter};
pub use input::KeyHandlerResult;
pub use matcher::{MatchResult, MatchState, Trigger};
pub use menu::{ClassNames, Visibility};
pub use query::{QueryHandler, QueryRequest, QueryResponse};
pub use store::{CompletionOption, OptionId, OptionKind, OptionRef};
pub use surface::{RewriteError, RichText, Surface, TextBuffer};
