use std::fmt;

const LOG_PREFIX: &str = "LOG:";
const METRIC_PREFIX: &str = "METRIC:";

/// Backend a generated query is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRoute {
    Metrics,
    Logs,
}

impl fmt::Display for QueryRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metrics => f.write_str("metrics"),
            Self::Logs => f.write_str("logs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedQuery<'a> {
    pub route: QueryRoute,
    pub query: &'a str,
}

/// Classify generated text by its literal, case-sensitive prefix.
///
/// `LOG:` selects the log backend. Anything else goes to metrics, with a
/// leading `METRIC:` removed. The remainder is trimmed.
pub fn route_generated_query(text: &str) -> RoutedQuery<'_> {
    if let Some(rest) = text.strip_prefix(LOG_PREFIX) {
        return RoutedQuery {
            route: QueryRoute::Logs,
            query: rest.trim(),
        };
    }

    let rest = text.strip_prefix(METRIC_PREFIX).unwrap_or(text);
    RoutedQuery {
        route: QueryRoute::Metrics,
        query: rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_prefix() {
        let routed = route_generated_query("LOG: _time:5m error");
        assert_eq!(routed.route, QueryRoute::Logs);
        assert_eq!(routed.query, "_time:5m error");
    }

    #[test]
    fn test_metric_prefix() {
        let routed = route_generated_query("METRIC:  avg(cpu_usage_pct) ");
        assert_eq!(routed.route, QueryRoute::Metrics);
        assert_eq!(routed.query, "avg(cpu_usage_pct)");
    }

    #[test]
    fn test_unprefixed_defaults_to_metrics() {
        let routed = route_generated_query(" rate(net_bytes[5m]) ");
        assert_eq!(routed.route, QueryRoute::Metrics);
        assert_eq!(routed.query, "rate(net_bytes[5m])");
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let routed = route_generated_query("log: _time:5m");
        assert_eq!(routed.route, QueryRoute::Metrics);
        assert_eq!(routed.query, "log: _time:5m");
    }
}
