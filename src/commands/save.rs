/// `lager save` command implementation
///
/// Post-job half of a cache action: decides whether the workspace should be
/// persisted and delegates the actual save to the cache service.
use anyhow::Result;

use crate::cache::{ActionsCacheClient, CacheError, CacheService, SaveOptions};
use crate::cli::SaveArgs;
use crate::runtime::{command, env, inputs, state};

pub async fn run(args: &SaveArgs) -> Result<()> {
    // The save step must never fail the surrounding job; anything that
    // escapes the flow becomes a workflow warning and the process exits 0.
    if let Err(err) = execute(|| client_from(args)).await {
        command::warning(&err.to_string());
    }
    Ok(())
}

fn client_from(args: &SaveArgs) -> Result<ActionsCacheClient> {
    match (&args.cache_url, &args.runtime_token) {
        (Some(cache_url), Some(token)) => {
            Ok(ActionsCacheClient::new(cache_url.clone(), token.clone()))
        }
        _ => ActionsCacheClient::from_env(),
    }
}

/// The save decision flow
///
/// Guards run before the service is even constructed, so a runner without
/// cache credentials still gets the specific skip reason rather than a
/// missing-variable error.
async fn execute<C, F>(make_service: F) -> Result<()>
where
    C: CacheService,
    F: FnOnce() -> Result<C>,
{
    if env::is_ghes() {
        command::warning("Cache action is not supported on GHES");
        return Ok(());
    }

    if !env::is_valid_event() {
        command::warning(&format!(
            "Event Validation Error: The event type {} is not supported because it's not tied to a branch or tag ref.",
            env::event_name()
        ));
        return Ok(());
    }

    let restored_key = state::get_state(state::CACHE_RESULT);

    // Inputs are re-evaluated before the post step runs; the key used at
    // restore time lives in state, not in the `key` input.
    let primary_key = state::get_state(state::CACHE_KEY);
    if primary_key.is_empty() {
        command::warning("Error retrieving key from state.");
        return Ok(());
    }

    if inputs::get_input_as_bool(inputs::ALWAYS_SAVE) {
        command::info("always-save is enabled, saving cache regardless of the restore result");
    } else if is_exact_key_match(&primary_key, &restored_key) {
        command::info(&format!(
            "Cache hit occurred on the primary key {}, not saving cache.",
            primary_key
        ));
        return Ok(());
    }

    let cache_paths = inputs::get_input_as_array(inputs::PATH);
    if cache_paths.is_empty() {
        anyhow::bail!("Input required and not supplied: {}", inputs::PATH);
    }

    let options = SaveOptions {
        upload_chunk_size: inputs::get_input_as_int(inputs::UPLOAD_CHUNK_SIZE)
            .filter(|size| *size > 0)
            .map(|size| size as u64),
    };

    let service = make_service()?;
    match service.save_cache(&cache_paths, &primary_key, &options).await {
        Ok(_) => command::info(&format!("Cache saved with key: {}", primary_key)),
        Err(err @ CacheError::Validation(_)) => return Err(err.into()),
        Err(err @ CacheError::Reserve { .. }) => command::info(&err.to_string()),
        Err(err) => command::warning(&err.to_string()),
    }

    Ok(())
}

/// Whether the restore step hit this key exactly
///
/// Keys compare case-insensitively; an empty restored key means the restore
/// step missed.
fn is_exact_key_match(key: &str, restored_key: &str) -> bool {
    !restored_key.is_empty() && key.to_lowercase() == restored_key.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::sync::{Arc, Mutex};

    type RecordedCall = (Vec<String>, String, Option<u64>);

    #[derive(Clone, Default)]
    struct MockService {
        calls: Arc<Mutex<Vec<RecordedCall>>>,
        fail_with: Option<fn(&str) -> CacheError>,
    }

    impl MockService {
        fn failing(fail_with: fn(&str) -> CacheError) -> Self {
            Self {
                fail_with: Some(fail_with),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CacheService for MockService {
        async fn save_cache(
            &self,
            paths: &[String],
            key: &str,
            options: &SaveOptions,
        ) -> Result<i64, CacheError> {
            self.calls.lock().unwrap().push((
                paths.to_vec(),
                key.to_string(),
                options.upload_chunk_size,
            ));
            match self.fail_with {
                Some(fail) => Err(fail(key)),
                None => Ok(42),
            }
        }
    }

    fn reserve_conflict(key: &str) -> CacheError {
        CacheError::Reserve {
            key: key.to_string(),
        }
    }

    fn comma_key(key: &str) -> CacheError {
        CacheError::Validation(format!(
            "Key Validation Error: {} cannot contain commas.",
            key
        ))
    }

    fn reset_env() {
        for var in [
            "GITHUB_SERVER_URL",
            "GITHUB_REF",
            "GITHUB_EVENT_NAME",
            "STATE_CACHE_KEY",
            "STATE_CACHE_RESULT",
            "INPUT_PATH",
            "INPUT_ALWAYS-SAVE",
            "INPUT_UPLOAD-CHUNK-SIZE",
        ] {
            env::remove_var(var);
        }
    }

    fn on_branch_with_key(primary_key: &str, restored_key: &str) {
        env::set_var("GITHUB_REF", "refs/heads/main");
        env::set_var("STATE_CACHE_KEY", primary_key);
        env::set_var("STATE_CACHE_RESULT", restored_key);
    }

    async fn execute_with(service: &MockService) -> Result<()> {
        let service = service.clone();
        execute(move || Ok(service)).await
    }

    #[tokio::test]
    #[serial]
    async fn skips_on_ghes() {
        reset_env();
        env::set_var("GITHUB_SERVER_URL", "https://github.mycorp.com");

        let service = MockService::default();
        execute_with(&service).await.unwrap();
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn skips_events_without_a_ref() {
        reset_env();
        env::set_var("GITHUB_EVENT_NAME", "issue_comment");

        let service = MockService::default();
        execute_with(&service).await.unwrap();
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn skips_without_a_state_key() {
        reset_env();
        env::set_var("GITHUB_REF", "refs/heads/main");

        let service = MockService::default();
        execute_with(&service).await.unwrap();
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn skips_on_exact_key_match() {
        reset_env();
        on_branch_with_key("linux-build", "Linux-Build");
        env::set_var("INPUT_PATH", "target");

        let service = MockService::default();
        execute_with(&service).await.unwrap();
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn always_save_overrides_an_exact_match() {
        reset_env();
        on_branch_with_key("linux-build", "linux-build");
        env::set_var("INPUT_PATH", "target");
        env::set_var("INPUT_ALWAYS-SAVE", "true");

        let service = MockService::default();
        execute_with(&service).await.unwrap();
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn saves_after_a_partial_restore() {
        reset_env();
        on_branch_with_key("linux-build-deadbeef", "linux-build");
        env::set_var("INPUT_PATH", "target\n.cargo/registry");
        env::set_var("INPUT_UPLOAD-CHUNK-SIZE", "8388608");

        let service = MockService::default();
        execute_with(&service).await.unwrap();

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        let (paths, key, chunk_size) = &calls[0];
        assert_eq!(paths, &vec!["target".to_string(), ".cargo/registry".to_string()]);
        assert_eq!(key, "linux-build-deadbeef");
        assert_eq!(*chunk_size, Some(8388608));
    }

    #[tokio::test]
    #[serial]
    async fn missing_path_input_is_an_error() {
        reset_env();
        on_branch_with_key("linux-build", "");

        let service = MockService::default();
        let err = execute_with(&service).await.unwrap_err();
        assert!(err.to_string().contains("Input required and not supplied: path"));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn reserve_conflicts_are_not_errors() {
        reset_env();
        on_branch_with_key("linux-build", "");
        env::set_var("INPUT_PATH", "target");

        let service = MockService::failing(reserve_conflict);
        execute_with(&service).await.unwrap();
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn validation_errors_propagate() {
        reset_env();
        on_branch_with_key("linux,build", "");
        env::set_var("INPUT_PATH", "target");

        let service = MockService::failing(comma_key);
        let err = execute_with(&service).await.unwrap_err();
        assert!(err.to_string().contains("Key Validation Error"));
    }

    #[test]
    fn exact_key_match_is_case_insensitive() {
        assert!(is_exact_key_match("linux-build", "LINUX-BUILD"));
        assert!(!is_exact_key_match("linux-build", "linux-build-old"));
        assert!(!is_exact_key_match("linux-build", ""));
    }
}
