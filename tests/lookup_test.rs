//! End-to-end lookups through [`Bot`]: tier precedence and the documented scenarios.

use std::sync::Arc;

use botcreator::{Bot, FixedChooser, Tier};

async fn bot(rules: &str) -> Bot {
    Bot::builder().rules_text(rules).build().await.unwrap()
}

// =========================================================================
// Scenarios
// =========================================================================

#[tokio::test]
async fn greeting_returns_one_of_its_responses() {
    let bot = bot("hello/Hi there#Hey!").await;
    let responses = bot.resolve("hello").unwrap().responses;
    assert_eq!(responses.len(), 2);
    for _ in 0..20 {
        let reply = bot.lookup("hello").unwrap();
        assert!(responses.contains(&reply), "unexpected {reply}");
    }
    assert!(!responses.contains("Hi"));
}

#[tokio::test]
async fn all_and_terms_present_matches() {
    let bot = bot("weather&today/It's sunny today.").await;
    assert_eq!(
        bot.lookup("what's the weather today").as_deref(),
        Some("It's sunny today.")
    );
}

#[tokio::test]
async fn any_or_group_matches() {
    let bot = bot("cat#dog/Nice pet!").await;
    assert_eq!(bot.lookup("I have a dog").as_deref(), Some("Nice pet!"));
    assert_eq!(bot.lookup("my cat sleeps").as_deref(), Some("Nice pet!"));
}

#[tokio::test]
async fn partial_match_is_used_when_nothing_else_hits() {
    let bot = bot("hi/Hello!\nbye&now/Later\nfish#bird/Pets").await;
    let found = bot.resolve("hi there").unwrap();
    assert_eq!(found.tier, Tier::Partial);
    assert_eq!(bot.lookup("hi there").as_deref(), Some("Hello!"));
}

#[tokio::test]
async fn unmatched_prompt_returns_none() {
    let bot = bot("hello/Hi\ncat#dog/Pet\nweather&today/Sunny").await;
    assert!(bot.lookup("tell me a story").is_none());
    assert!(bot.resolve("tell me a story").is_none());
}

// =========================================================================
// Precedence and tie-breaks
// =========================================================================

#[tokio::test]
async fn exact_match_beats_conditional_match() {
    let bot = bot("hello&there/conditional\nhello there/exact").await;
    assert_eq!(bot.lookup("hello there").as_deref(), Some("exact"));
}

#[tokio::test]
async fn duplicate_exact_patterns_use_the_first() {
    let bot = bot("ping/first\nping/second").await;
    for _ in 0..10 {
        assert_eq!(bot.lookup("ping").as_deref(), Some("first"));
    }
}

#[tokio::test]
async fn matched_rule_is_deterministic() {
    let bot = bot("a/x#y#z\na&b/c\nb/d").await;
    let first = bot.resolve("a b").unwrap();
    for _ in 0..10 {
        assert_eq!(bot.resolve("a b").unwrap(), first);
    }
    assert_eq!(first.tier, Tier::Conditional);
}

#[tokio::test]
async fn and_terms_are_trimmed() {
    let bot = bot("weather & today / Sunny").await;
    // The response side keeps its whitespace; only pattern terms are trimmed.
    assert_eq!(bot.lookup("weather today").as_deref(), Some(" Sunny"));
}

#[tokio::test]
async fn comments_are_not_rules() {
    let bot = bot("$#hello/commented out\nhello/Hi").await;
    assert_eq!(bot.rule_set().len(), 1);
    assert_eq!(bot.lookup("hello").as_deref(), Some("Hi"));
}

#[tokio::test]
async fn malformed_lines_do_not_block_the_rest() {
    let bot = bot("a/b/c\nempty/\nhello/Hi").await;
    assert_eq!(bot.rule_set().len(), 1);
    assert_eq!(bot.lookup("hello").as_deref(), Some("Hi"));
}

// =========================================================================
// Injected randomness
// =========================================================================

#[tokio::test]
async fn injected_chooser_gives_exact_output() {
    let chooser = Arc::new(FixedChooser::new(1));
    let bot = Bot::builder()
        .rules_text("hello/Hi there#Hey!#Yo")
        .chooser(chooser.clone())
        .build()
        .await
        .unwrap();

    assert_eq!(bot.lookup("hello").as_deref(), Some("Hey!"));
    chooser.set(2);
    // Served from the cache this time, picked again.
    assert_eq!(bot.lookup("hello").as_deref(), Some("Yo"));
}

#[tokio::test]
async fn cached_hits_still_vary() {
    let bot = bot("hello/one#two#three#four").await;
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(bot.lookup("hello").unwrap());
    }
    assert!(seen.len() > 1, "cache must not freeze a single choice");
}

// =========================================================================
// Builder
// =========================================================================

#[tokio::test]
async fn build_without_source_fails() {
    let result = Bot::builder().build().await;
    assert!(matches!(
        result,
        Err(botcreator::BotError::Configuration(_))
    ));
}

#[tokio::test]
async fn build_with_missing_file_fails() {
    let result = Bot::builder()
        .rules_file("/nonexistent/botcreator/rules.txt")
        .build()
        .await;
    assert!(matches!(result, Err(botcreator::BotError::Io { .. })));
}

#[tokio::test]
async fn lookup_works_with_cache_disabled() {
    let bot = Bot::builder()
        .rules_text("hello/Hi")
        .disable_cache()
        .build()
        .await
        .unwrap();
    assert!(!bot.cache().is_enabled());
    assert_eq!(bot.lookup("hello").as_deref(), Some("Hi"));
    assert_eq!(bot.lookup("hello").as_deref(), Some("Hi"));
}

#[tokio::test]
async fn bot_is_shareable_across_threads() {
    let bot = Arc::new(bot("hello/Hi\nweather&today/Sunny").await);
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let bot = Arc::clone(&bot);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let prompt = if i % 2 == 0 { "hello" } else { "weather today?" };
                    assert!(bot.lookup(prompt).is_some());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
