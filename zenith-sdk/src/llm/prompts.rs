//! Prompt templates shared by all providers

pub(crate) const SYSTEM_PERSONA: &str = "You are Zenith, an assistant that analyses operating \
system performance from collected metrics and logs. Be concise, focus on the data and avoid \
conversational filler.";

pub(crate) fn generate_query(question: &str) -> String {
    format!(
        "{SYSTEM_PERSONA}\n\n\
         Two databases are available:\n\
         1. VictoriaMetrics, queried with MetricsQL (PromQL compatible). Metrics: cpu_usage_pct, \
         memory_used_mb, memory_free_mb, process_cpu_pct, process_memory_mb.\n\
         2. VictoriaLogs, queried with LogsQL. Fields: processName, subsystem, category, \
         messageType, eventMessage.\n\n\
         Reply with ONLY the query, prefixed with 'METRIC:' or 'LOG:'. No explanation, no markdown.\n\
         Match process names case-insensitively, e.g. process_memory_mb{{process_name=~\"(?i)ollama\"}}.\n\n\
         Examples: METRIC: avg(cpu_usage_pct)\n\
         LOG: eventMessage:\"error\"\n\n\
         Question: {question}\n\
         Query:"
    )
}

pub(crate) fn explain(question: &str, query: &str, results: &str) -> String {
    format!(
        "{SYSTEM_PERSONA}\n\n\
         Answer the question using the query results below. Do not explain the query syntax. \
         If the results are empty, say 'No relevant data found'.\n\n\
         Question: {question}\n\
         Query executed: {query}\n\
         Results:\n{results}\n\n\
         Answer:"
    )
}

pub(crate) fn recommendations(summary: &str) -> String {
    format!(
        "{SYSTEM_PERSONA}\n\n\
         Based on the recent system summary below, list the most useful actions to improve \
         performance. Reference the processes and numbers that justify each action. If the data \
         shows no problem, say so.\n\n\
         Summary:\n{summary}\n\n\
         Recommendations:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_embed_inputs() {
        assert!(generate_query("cpu now?").contains("Question: cpu now?"));
        let p = explain("q", "METRIC: up", "");
        assert!(p.contains("Query executed: METRIC: up"));
        assert!(p.contains("No relevant data found"));
        assert!(recommendations("cpu 99%").contains("cpu 99%"));
    }
}
