//! Built-in content that keeps question generation useful without any model backend:
//! fallback MCQ scenario templates with their paired option sets, and the defaults used to
//! backfill incomplete coding questions.

/// Scenario templates, `{topic}` is replaced by the slot label.
/// Template `i` pairs with `FALLBACK_OPTION_SETS[i]`.
pub const FALLBACK_SCENARIO_TEMPLATES: [&str; 8] = [
  "(Topic: {topic}) You need to optimize the {topic} layer of your application. Which improvement is most appropriate?",
  "(Topic: {topic}) A recent deployment involving {topic} caused a regression. How do you resolve it?",
  "(Topic: {topic}) You are tasked with scaling the {topic} infrastructure. What is the best approach?",
  "(Topic: {topic}) Security vulnerabilities were found in the {topic} implementation. How should they be mitigated?",
  "(Topic: {topic}) The development team is struggling with {topic} maintainability. What architectural pattern helps?",
  "(Topic: {topic}) {topic} is consuming too much memory/CPU. What is the standard optimization technique?",
  "(Topic: {topic}) Integration tests for {topic} are flaky. What is the most likely root cause?",
  "(Topic: {topic}) A new team member asks for the best practice when configuring {topic}. What do you recommend?",
];

/// First option of every set is the correct one.
pub const FALLBACK_OPTION_SETS: [[&str; 4]; 8] = [
  ["Add a caching layer with TTL", "Disable all logging", "Ignore the issue", "Increase retries blindly"],
  ["Introduce circuit breakers", "Remove health checks", "Add more servers without investigation", "Hard-code timeouts"],
  ["Check resource limits and liveness probes", "Delete and recreate the cluster", "Ignore pod restarts", "Disable autoscaling"],
  ["Add proper indexing and reduce lock scope", "Remove all transactions", "Increase connection pool to 10000", "Switch to a NoSQL database blindly"],
  ["Profile re-renders and memoize hot paths", "Remove all state management", "Add more useEffect hooks", "Disable React strict mode"],
  ["Add regularization and early stopping", "Train for more epochs without changes", "Remove the validation set", "Increase model size dramatically"],
  ["Add retry logic with idempotency checks", "Remove the deploy step", "Skip tests to speed up the pipeline", "Run deploys only manually"],
  ["Implement service discovery with health checks", "Hard-code all service URLs", "Remove inter-service communication", "Restart all services simultaneously"],
];

pub const FALLBACK_MCQ_HINT: &str = "Think about reliability, performance, and best practices.";

// Fallback coding task.
pub const FALLBACK_CODING_LANGUAGE: &str = "python";
pub const FALLBACK_CODING_PARAM: &str = "config_data";
pub const FALLBACK_CODING_FLAG: &str = "status_flag";
pub const FALLBACK_CODING_HINT: &str =
  "Make sure to define the function, use the required variables, and return True.";
pub const FALLBACK_CODING_REASON: &str =
  "This is the standard approach for this feature, ensuring all required variables are used.";

// Backfill for coding questions a model returned incomplete.
pub const DEFAULT_CODING_LANGUAGE: &str = "typescript";
pub const DEFAULT_STARTER_CODE: &str = "// implement solution here\n";
pub const DEFAULT_REQUIRED_TOKENS: [&str; 2] = ["function", "return"];
pub const MISSING_SOLUTION_MARKER: &str =
  "// The AI did not provide a complete solution for this question.";
