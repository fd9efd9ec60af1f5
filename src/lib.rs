//! botcreator: rule-file chatbot engine
//!
//! Answers free-text prompts from a flat rule file. Each line maps a pattern
//! to one or more responses:
//!
//! ```text
//! hello/Hi there#Hey!
//! weather&today/It's sunny today.
//! cat#dog/Nice pet!
//! ```
//!
//! A lookup tries three tiers in order (exact match, `&`/`#` conditions,
//! substring match), picks one response of the first matching rule at
//! random, and caches the matched responses per prompt. Rules can be
//! reloaded while lookups are running.
//!
//! # Example
//!
//! ```rust
//! use botcreator::Bot;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> botcreator::Result<()> {
//!     let bot = Bot::builder()
//!         .rules_text("hello/Hi there#Hey!\nweather&today/It's sunny today.")
//!         .build()
//!         .await?;
//!
//!     let reply = bot.lookup("what's the weather today");
//!     assert_eq!(reply.as_deref(), Some("It's sunny today."));
//!     assert!(bot.lookup("something else").is_none());
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod cache;
pub mod chooser;
pub mod config;
pub mod error;
pub mod reload;
pub mod resolver;
pub mod rules;
pub mod source;
pub mod telemetry;
mod version;

// Re-export main types at crate root
pub use bot::{Bot, BotBuilder};
pub use cache::{CacheConfig, ResponseCache};
pub use chooser::{FixedChooser, ResponseChooser, SeededChooser, ThreadRngChooser};
pub use config::Config;
pub use error::{BotError, FormatError, FormatErrorKind, Result};
pub use reload::{
    ChangeNotifier, ChangeSubscription, InvalidationPolicy, ReloadCoordinator, ReloadReport,
    change_signal,
};
pub use resolver::{Match, Tier, resolve, respond};
pub use rules::{ParsedRules, ResponseSet, RuleSet, parse};
pub use source::{FileRuleSource, MemoryRuleSource, RuleSource};
pub use version::{PKG_VERSION, version_string};
