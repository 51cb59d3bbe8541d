//! Tests for resource loading through the environment cache.

use std::fs;
use std::future::Future;
use std::iter;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lexis::runtime::{DiagnosticDetail, MemoryFetcher, PseudoStrategy, Severity};
use lexis::{Env, FetchError, LoadError, ResourceFetcher, args};
use tokio::fs::read_to_string;
use tokio::time::sleep;
use tracing_subscriber::{EnvFilter, fmt};

type FetchLog = Arc<Mutex<Vec<(String, String)>>>;

/// Serves from memory, records every fetch and yields before answering so
/// that concurrent loads overlap.
struct CountingFetcher {
    inner: MemoryFetcher,
    log: FetchLog,
}

impl CountingFetcher {
    fn new(inner: MemoryFetcher) -> (Self, FetchLog) {
        let log = FetchLog::default();
        let fetcher = Self {
            inner,
            log: Arc::clone(&log),
        };
        (fetcher, log)
    }
}

impl ResourceFetcher for CountingFetcher {
    fn fetch(
        &self,
        res_id: &str,
        language: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send {
        self.log
            .lock()
            .unwrap()
            .push((res_id.to_string(), language.to_string()));
        let result = self.inner.fetch(res_id, language);
        async move {
            sleep(Duration::from_millis(10)).await;
            result.await
        }
    }
}

/// Reads `<root>/<language>/<res_id>`.
struct FsFetcher {
    root: PathBuf,
}

impl ResourceFetcher for FsFetcher {
    fn fetch(
        &self,
        res_id: &str,
        language: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send {
        let path = self.root.join(language).join(res_id);
        async move { Ok(read_to_string(path).await?) }
    }
}

/// Route engine logs to the test output; `RUST_LOG=lexis=debug` shows
/// cache traffic.
fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sources() -> MemoryFetcher {
    MemoryFetcher::new()
        .with("app.properties", "en-US", "hello = Hello\nbye = Goodbye")
        .with("app.properties", "fr", "hello = Bonjour")
        .with("shared.properties", "en-US", "hello = Shadowed\nbrand = Lexis")
        .with("broken.properties", "en-US", "a.b.c = deep")
}

fn counting_env() -> (Arc<Env<CountingFetcher>>, FetchLog) {
    init_tracing();
    let (fetcher, log) = CountingFetcher::new(sources());
    let env = Env::builder()
        .fetcher(fetcher)
        .default_language("en-US")
        .available_languages(vec!["en-US".to_string(), "fr".to_string(), "de".to_string()])
        .build();
    (Arc::new(env), log)
}

fn fetched(log: &FetchLog) -> Vec<(String, String)> {
    let mut entries = log.lock().unwrap().clone();
    entries.sort();
    entries
}

fn pair(res_id: &str, language: &str) -> (String, String) {
    (res_id.to_string(), language.to_string())
}

// =============================================================================
// Single fetch
// =============================================================================

#[tokio::test]
async fn concurrent_contexts_share_one_fetch() {
    let (env, log) = counting_env();
    let mut first = env.create_context(["app.properties"]);
    let mut second = env.create_context(["app.properties"]);
    first.request_languages(&["fr"]).unwrap();
    second.request_languages(&["fr"]).unwrap();

    let (a, b) = tokio::join!(first.ready(), second.ready());
    a.unwrap();
    b.unwrap();
    assert_eq!(fetched(&log), [pair("app.properties", "fr")]);

    let (first_args, second_args) = (args! {}, args! {});
    let (a, b) = tokio::join!(
        first.resolve_value("bye", &first_args),
        second.resolve_value("bye", &second_args)
    );
    assert_eq!(a.unwrap().value, "Goodbye");
    assert_eq!(b.unwrap().value, "Goodbye");
    assert_eq!(
        fetched(&log),
        [pair("app.properties", "en-US"), pair("app.properties", "fr")]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_resolutions_share_one_fetch() {
    let (env, log) = counting_env();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let mut ctx = env.create_context(["app.properties"]);
        ctx.request_languages(&["fr"]).unwrap();
        handles.push(tokio::spawn(async move {
            ctx.resolve_value("hello", &args! {}).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().value, "Bonjour");
    }
    assert_eq!(fetched(&log), [pair("app.properties", "fr")]);
}

#[tokio::test]
async fn failed_fetch_is_cached() {
    let (env, log) = counting_env();
    let mut rx = env.subscribe();
    let mut ctx = env.create_context(["app.properties"]);
    ctx.request_languages(&["de"]).unwrap();

    for _ in 0..2 {
        let translation = ctx.resolve_value("hello", &args! {}).await.unwrap();
        assert_eq!(translation.value, "Hello");
        assert_eq!(translation.language.as_deref(), Some("en-US"));
    }
    let mut other = env.create_context(["app.properties"]);
    other.request_languages(&["de"]).unwrap();
    other.ready().await.unwrap();

    assert_eq!(
        fetched(&log),
        [pair("app.properties", "de"), pair("app.properties", "en-US")]
    );

    let load = rx.try_recv().unwrap();
    assert_eq!(load.severity, Severity::Error);
    insta::assert_snapshot!(load.to_string(), @"[de] cannot load 'app.properties': failed to fetch 'app.properties' for 'de': resource 'app.properties' not found for 'de'");
    let loads = iter::from_fn(|| rx.try_recv().ok())
        .filter(|diagnostic| matches!(diagnostic.detail, DiagnosticDetail::Load { .. }))
        .count();
    assert_eq!(loads, 0);
}

#[tokio::test]
async fn failed_slot_keeps_the_error() {
    let (env, _log) = counting_env();
    let slot = env.get_resource("app.properties", "de").await;
    let Err(LoadError::Fetch { source, .. }) = slot.as_ref() else {
        panic!("expected a fetch error, got {slot:?}");
    };
    assert!(matches!(source, FetchError::NotFound { .. }));
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let (env, log) = counting_env();
    let mut ctx = env.create_context(["app.properties"]);
    ctx.request_languages(&["fr"]).unwrap();
    ctx.ready().await.unwrap();

    env.invalidate();
    ctx.resolve_value("hello", &args! {}).await.unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);

    let mut fresh = env.create_context(["app.properties"]);
    fresh.request_languages(&["fr"]).unwrap();
    fresh.ready().await.unwrap();
    assert_eq!(
        fetched(&log),
        [pair("app.properties", "fr"), pair("app.properties", "fr")]
    );
}

// =============================================================================
// Formats and resource order
// =============================================================================

#[tokio::test]
async fn unknown_extension_is_not_fetched() {
    let (env, log) = counting_env();
    let mut rx = env.subscribe();
    let mut ctx = env.create_context(["app.ftl"]);
    ctx.request_languages(&["en-US"]).unwrap();

    let translation = ctx.resolve_value("hello", &args! {}).await.unwrap();
    assert_eq!(translation.value, "[hello]");
    assert!(fetched(&log).is_empty());

    let load = rx.try_recv().unwrap();
    insta::assert_snapshot!(load.to_string(), @"[en-US] cannot load 'app.ftl': no parser for 'app.ftl' (extension 'ftl')");
}

#[tokio::test]
async fn parse_failure_leaves_other_resources_usable() {
    let (env, _log) = counting_env();
    let mut rx = env.subscribe();
    let mut ctx = env.create_context(["broken.properties", "shared.properties"]);
    ctx.request_languages(&["en-US"]).unwrap();

    let translation = ctx.resolve_value("brand", &args! {}).await.unwrap();
    assert_eq!(translation.value, "Lexis");

    let load = rx.try_recv().unwrap();
    assert_eq!(
        load.detail,
        DiagnosticDetail::Load {
            res_id: "broken.properties".to_string(),
            message: "broken.properties:1:0: line 1: nested attributes are not supported in 'a.b.c'"
                .to_string(),
        }
    );
}

#[tokio::test]
async fn first_resource_defining_an_id_wins() {
    let (env, _log) = counting_env();
    let mut ctx = env.create_context(["app.properties", "shared.properties"]);
    ctx.request_languages(&["en-US"]).unwrap();
    assert_eq!(
        ctx.resolve_value("hello", &args! {}).await.unwrap().value,
        "Hello"
    );

    let mut reversed = env.create_context(["shared.properties", "app.properties"]);
    reversed.request_languages(&["en-US"]).unwrap();
    assert_eq!(
        reversed.resolve_value("hello", &args! {}).await.unwrap().value,
        "Shadowed"
    );
}

#[tokio::test]
async fn json_resources_load_by_extension() {
    let fetcher = MemoryFetcher::new().with(
        "app.json",
        "en-US",
        r#"[{"id": "greeting", "value": "Hi {{ name }}"}]"#,
    );
    let env = Arc::new(
        Env::builder()
            .fetcher(fetcher)
            .default_language("en-US")
            .build(),
    );
    let mut ctx = env.create_context(["app.json"]);
    ctx.request_languages(&["en-US"]).unwrap();
    let translation = ctx
        .resolve_value("greeting", &args! { "name" => "Ann" })
        .await
        .unwrap();
    assert_eq!(translation.value, "Hi \u{2068}Ann\u{2069}");
}

// =============================================================================
// Pseudo-locales
// =============================================================================

#[tokio::test]
async fn pseudo_locale_derives_from_default_language() {
    let (env, log) = counting_env();
    let mut ctx = env.create_context(["app.properties"]);
    ctx.request_languages(&["qps-ploc"]).unwrap();

    let translation = ctx.resolve_value("bye", &args! {}).await.unwrap();
    assert_eq!(translation.value, PseudoStrategy::Accented.translate("Goodbye"));
    assert_eq!(translation.language.as_deref(), Some("qps-ploc"));
    assert_eq!(env.plural_language("qps-ploc"), "en-US");

    let mut plain = env.create_context(["app.properties"]);
    plain.request_languages(&["en-US"]).unwrap();
    plain.ready().await.unwrap();
    assert_eq!(fetched(&log), [pair("app.properties", "en-US")]);
}

#[tokio::test]
async fn shipped_pseudo_resources_are_fetched() {
    let fetcher = sources().with("app.properties", "qps-ploc", "hello = Shipped");
    let env = Arc::new(
        Env::builder()
            .fetcher(fetcher)
            .default_language("en-US")
            .available_languages(vec!["en-US".to_string(), "qps-ploc".to_string()])
            .build(),
    );
    let mut ctx = env.create_context(["app.properties"]);
    ctx.request_languages(&["qps-ploc"]).unwrap();
    let translation = ctx.resolve_value("hello", &args! {}).await.unwrap();
    assert_eq!(translation.value, "Shipped");
    assert_eq!(env.plural_language("qps-ploc"), "qps-ploc");
}

// =============================================================================
// Custom fetchers
// =============================================================================

#[tokio::test]
async fn filesystem_fetcher() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("en-US")).unwrap();
    fs::create_dir(dir.path().join("fr")).unwrap();
    fs::write(
        dir.path().join("en-US/app.properties"),
        "hello = Hello\nitems = {[ plural(n) ]}\nitems[one] = One item\nitems[other] = Many items",
    )
    .unwrap();
    fs::write(dir.path().join("fr/app.properties"), "hello = Bonjour").unwrap();

    let env = Arc::new(
        Env::builder()
            .fetcher(FsFetcher {
                root: dir.path().to_path_buf(),
            })
            .default_language("en-US")
            .available_languages(vec!["en-US".to_string(), "fr".to_string()])
            .build(),
    );
    let mut rx = env.subscribe();
    let mut ctx = env.create_context(["app.properties", "missing.properties"]);
    ctx.request_languages(&["fr"]).unwrap();

    assert_eq!(
        ctx.resolve_value("hello", &args! {}).await.unwrap().value,
        "Bonjour"
    );
    let items = ctx
        .resolve_value("items", &args! { "n" => 1 })
        .await
        .unwrap();
    assert_eq!(items.value, "One item");
    assert_eq!(items.language.as_deref(), Some("en-US"));

    let load = rx.try_recv().unwrap();
    assert!(matches!(
        load.detail,
        DiagnosticDetail::Load { ref res_id, .. } if res_id == "missing.properties"
    ));
}
