//! Cached, retried completion requests

use vetdx_core::{ResponseCache, fingerprint};

use super::client::{ChatCompletion, OpenRouterClient, UpstreamError};
use super::retry::{RetryConfig, retry_with_backoff};

/// Shared cache of raw provider responses
pub type CompletionCache = ResponseCache<ChatCompletion>;

/// Fetch the model's text for `prompt`.
///
/// A cache hit returns immediately without touching the network. On a miss
/// the call is retried per `retry`, and only a successful response is cached.
pub async fn fetch_completion(
    client: &OpenRouterClient,
    cache: &CompletionCache,
    retry: &RetryConfig,
    prompt: &str,
    temperature: f32,
) -> Result<String, UpstreamError> {
    let key = fingerprint(prompt, client.model());

    if let Some(cached) = cache.get(&key) {
        tracing::info!(cache_key = %key, "Using cached response");
        metrics::counter!("upstream_cache_total", "result" => "hit").increment(1);
        return cached.text().map(str::to_string);
    }
    metrics::counter!("upstream_cache_total", "result" => "miss").increment(1);

    let completion = retry_with_backoff(retry, "chat_completion", move || async move {
        let result = client.complete(prompt, temperature).await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::counter!("upstream_requests_total", "outcome" => outcome).increment(1);
        result
    })
    .await?;

    let text = completion.text()?.to_string();
    cache.put(key, completion);
    Ok(text)
}
