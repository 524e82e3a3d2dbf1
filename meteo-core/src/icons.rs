//! Concurrent icon loading.

use std::{collections::HashMap, sync::Arc};

use tokio::task::JoinSet;
use tracing::warn;

use crate::{IconBytes, WeatherError, WeatherProvider};

/// Fetch every distinct code on its own task.
///
/// Results are keyed by the code that was requested; completion order is not
/// observable. A task that panics is logged and left out of the map.
pub async fn fetch_icons<I, S>(
    provider: Arc<dyn WeatherProvider>,
    codes: I,
) -> HashMap<String, Result<IconBytes, WeatherError>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tasks = JoinSet::new();
    let mut requested: Vec<String> = Vec::new();

    for code in codes.into_iter().map(Into::into) {
        if requested.contains(&code) {
            continue;
        }
        requested.push(code.clone());

        let provider = Arc::clone(&provider);
        tasks.spawn(async move {
            let result = provider.icon(&code).await;
            (code, result)
        });
    }

    let mut results = HashMap::with_capacity(requested.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((code, result)) => {
                results.insert(code, result);
            }
            Err(e) => warn!(error = %e, "icon task did not complete"),
        }
    }

    results
}
