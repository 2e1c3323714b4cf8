//! Static topic catalog: category → canonical topics, the flattened topic set, and the
//! informal alias table.
//!
//! Everything here is read-only process-wide data. `validate()` runs once at startup; an
//! inconsistent catalog is a programming error and aborts the server before it binds.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Category → canonical topic names, in display order.
/// Client topic pickers mirror this table (see `GET /catalog`).
pub static CATALOG: &[(&str, &[&str])] = &[
  ("Frontend", &[
    "React", "Next.js", "TypeScript", "JavaScript", "CSS", "TailwindCSS", "Accessibility", "Web Performance",
    "State Management", "Redux", "Zustand", "MobX", "Testing Library", "Jest", "Playwright",
    "Animations", "Framer Motion", "SSR", "CSR", "Hydration", "Code Splitting", "Memoization",
    "WebSockets", "Service Workers", "PWA", "i18n", "Form Handling", "React Query", "TanStack Query",
    "Vite", "Webpack", "Babel", "Storybook", "Design Systems", "Component Architecture", "Hooks", "Context API",
  ]),
  ("Backend", &[
    "APIs", "REST", "GraphQL", "gRPC", "Microservices", "Monolith", "Caching", "Redis", "Queues", "RabbitMQ",
    "Kafka", "Databases", "PostgreSQL", "MySQL", "MongoDB", "ORM", "Prisma", "SQLAlchemy", "Auth", "OAuth2",
    "JWT", "Rate Limiting", "Circuit Breaker", "Observability", "Metrics", "Tracing", "Logging", "Testing",
    "Pagination", "Idempotency", "Schema Migrations", "Multi-tenancy", "API Gateway", "Service Discovery",
  ]),
  ("DevOps", &[
    "Docker", "Kubernetes", "Helm", "CI/CD", "GitHub Actions", "Terraform", "Ansible", "Prometheus", "Grafana",
    "ArgoCD", "Autoscaling", "Blue-Green", "Canary", "Load Balancing", "Nginx", "Istio", "Linkerd",
    "Secrets", "ConfigMaps", "RBAC", "Ingress", "EKS", "GKE", "AKS", "Cost Optimization",
  ]),
  ("System Design", &[
    "Scalability", "Availability", "Consistency", "CAP Theorem", "Sharding", "Replication", "Leader Election",
    "Distributed Caching", "CDN", "Global Traffic", "Failover", "Backpressure", "Rate Limiting",
    "Event Sourcing", "CQRS", "Read/Write Splitting", "Geo-partitioning", "Hot Partitions",
  ]),
  ("Machine Learning", &[
    "Model Training", "Data Preprocessing", "Feature Engineering", "Cross Validation", "Regularization",
    "Hyperparameter Tuning", "Overfitting", "Underfitting", "Model Serving", "Batch Inference", "Streaming Inference",
    "Embeddings", "Vector Databases", "Evaluation", "Drift Detection", "A/B Testing", "Monitoring", "Retraining",
  ]),
  ("Mobile", &[
    "React Native", "Swift", "Kotlin", "Android", "iOS", "Flutter", "Performance", "Offline Sync", "Push Notifications",
    "Background Tasks", "Deep Links", "App Store", "Play Store", "Crash Reporting",
  ]),
  ("Security", &[
    "OWASP", "Input Validation", "XSS", "CSRF", "SQL Injection", "Secrets Management", "Vulnerability Scanning",
    "Penetration Testing", "Threat Modeling", "Audit Logging", "Encryption", "TLS", "mTLS", "SSO",
  ]),
  ("Data Engineering", &[
    "ETL", "ELT", "Batch Processing", "Stream Processing", "Spark", "Flink", "Airflow", "dbt", "Lakehouse",
    "Delta Lake", "Data Quality", "Data Lineage", "Data Catalog", "Parquet", "Iceberg", "Hudi",
  ]),
];

/// Lowercase informal phrase → canonical topic.
pub static ALIASES: &[(&str, &str)] = &[
  ("reactjs", "React"), ("react.js", "React"), ("nextjs", "Next.js"), ("next js", "Next.js"),
  ("ts", "TypeScript"), ("js", "JavaScript"), ("tailwind", "TailwindCSS"), ("tailwind css", "TailwindCSS"),
  ("node", "APIs"), ("nodejs", "APIs"), ("node.js", "APIs"), ("express", "APIs"), ("fastapi", "APIs"),
  ("flask", "APIs"), ("django", "APIs"), ("sql", "Databases"), ("nosql", "MongoDB"),
  ("postgres", "PostgreSQL"), ("postgresql", "PostgreSQL"), ("mongo", "MongoDB"), ("mongodb", "MongoDB"),
  ("k8s", "Kubernetes"),
  ("ci cd", "CI/CD"), ("ci/cd", "CI/CD"), ("github actions", "GitHub Actions"), ("gh actions", "GitHub Actions"),
  ("ml", "Model Training"), ("machine learning", "Model Training"), ("deep learning", "Model Training"),
  ("neural network", "Model Training"), ("neural networks", "Model Training"),
  ("cnn", "Model Training"), ("rnn", "Model Training"), ("transformer", "Model Training"),
  ("transformers", "Model Training"), ("llm", "Model Training"), ("large language model", "Model Training"),
  ("nlp", "Embeddings"), ("natural language processing", "Embeddings"),
  ("server side rendering", "SSR"), ("client side rendering", "CSR"),
  ("code splitting", "Code Splitting"), ("state management", "State Management"),
  ("api", "APIs"), ("rest api", "REST"), ("restful", "REST"), ("graphql", "GraphQL"), ("grpc", "gRPC"),
  ("oauth", "OAuth2"), ("oauth2", "OAuth2"), ("json web token", "JWT"), ("json web tokens", "JWT"),
  ("rate limit", "Rate Limiting"), ("rate limiting", "Rate Limiting"),
  ("circuit breaker", "Circuit Breaker"), ("microservice", "Microservices"),
  ("cap theorem", "CAP Theorem"), ("event sourcing", "Event Sourcing"), ("event driven", "Event Sourcing"),
  ("container", "Docker"), ("containers", "Docker"), ("containerization", "Docker"),
  ("infrastructure as code", "Terraform"), ("iac", "Terraform"),
  ("load balancer", "Load Balancing"), ("load balancing", "Load Balancing"),
  ("message queue", "Queues"), ("cache", "Caching"),
  ("service mesh", "Istio"), ("configmap", "ConfigMaps"), ("configmaps", "ConfigMaps"),
  ("role based access", "RBAC"), ("auto scaling", "Autoscaling"),
  ("blue green", "Blue-Green"), ("blue green deployment", "Blue-Green"),
  ("canary deployment", "Canary"), ("argo cd", "ArgoCD"),
  ("leader election", "Leader Election"), ("distributed caching", "Distributed Caching"),
  ("global traffic", "Global Traffic"), ("read write splitting", "Read/Write Splitting"),
  ("read/write splitting", "Read/Write Splitting"),
  ("geo partitioning", "Geo-partitioning"), ("geo-partitioning", "Geo-partitioning"),
  ("hot partition", "Hot Partitions"), ("hot partitions", "Hot Partitions"),
  ("batch processing", "Batch Processing"), ("stream processing", "Stream Processing"),
  ("batch inference", "Batch Inference"), ("streaming inference", "Streaming Inference"),
  ("data preprocessing", "Data Preprocessing"), ("data augmentation", "Data Preprocessing"),
  ("feature engineering", "Feature Engineering"), ("cross validation", "Cross Validation"),
  ("hyperparameter", "Hyperparameter Tuning"), ("hyperparameter tuning", "Hyperparameter Tuning"),
  ("model serving", "Model Serving"), ("model deployment", "Model Serving"),
  ("vector database", "Vector Databases"), ("vector db", "Vector Databases"),
  ("drift detection", "Drift Detection"), ("model monitoring", "Monitoring"),
  ("a/b testing", "A/B Testing"), ("ab testing", "A/B Testing"),
  ("pwa", "PWA"), ("progressive web app", "PWA"),
  ("service worker", "Service Workers"), ("service workers", "Service Workers"),
  ("websocket", "WebSockets"), ("websockets", "WebSockets"),
  ("react hooks", "Hooks"), ("context api", "Context API"),
  ("content delivery network", "CDN"), ("orm", "ORM"), ("object relational mapping", "ORM"),
  ("api gateway", "API Gateway"), ("service discovery", "Service Discovery"),
  ("schema migration", "Schema Migrations"), ("schema migrations", "Schema Migrations"),
  ("database migration", "Schema Migrations"),
  ("multi tenancy", "Multi-tenancy"), ("multi-tenancy", "Multi-tenancy"),
  ("pen testing", "Penetration Testing"), ("penetration testing", "Penetration Testing"),
  ("ssl", "TLS"), ("single sign on", "SSO"),
  ("secret management", "Secrets Management"), ("secrets management", "Secrets Management"),
  ("vulnerability scanning", "Vulnerability Scanning"), ("threat modeling", "Threat Modeling"),
  ("audit log", "Audit Logging"), ("audit logging", "Audit Logging"),
  ("input validation", "Input Validation"),
  ("push notification", "Push Notifications"), ("push notifications", "Push Notifications"),
  ("offline sync", "Offline Sync"),
  ("background task", "Background Tasks"), ("background tasks", "Background Tasks"),
  ("deep link", "Deep Links"), ("deep links", "Deep Links"), ("deep linking", "Deep Links"),
  ("app store", "App Store"), ("play store", "Play Store"), ("crash reporting", "Crash Reporting"),
  ("model retraining", "Retraining"), ("model evaluation", "Evaluation"),
  ("design system", "Design Systems"), ("design systems", "Design Systems"),
  ("component architecture", "Component Architecture"),
  ("a11y", "Accessibility"), ("internationalization", "i18n"),
  ("form handling", "Form Handling"), ("forms", "Form Handling"),
  ("react query", "React Query"), ("tanstack query", "TanStack Query"),
  ("framer motion", "Framer Motion"), ("animation", "Animations"), ("animations", "Animations"),
  ("web performance", "Web Performance"), ("performance optimization", "Web Performance"),
  ("usememo", "Memoization"), ("usecallback", "Memoization"), ("memo", "Memoization"),
  ("unit testing", "Testing"), ("integration testing", "Testing"),
  ("apache spark", "Spark"), ("apache flink", "Flink"), ("apache airflow", "Airflow"),
  ("data pipeline", "ETL"), ("data pipelines", "ETL"),
  ("delta lake", "Delta Lake"), ("data quality", "Data Quality"),
  ("data lineage", "Data Lineage"), ("data catalog", "Data Catalog"),
  ("dropout", "Regularization"), ("l1 regularization", "Regularization"), ("l2 regularization", "Regularization"),
  ("react native", "React Native"),
];

/// Sorted, deduplicated union of every category's topics.
/// Some topics (e.g. "Rate Limiting") live in more than one category.
pub static ALL_TOPICS: Lazy<Vec<&'static str>> = Lazy::new(|| {
  CATALOG
    .iter()
    .flat_map(|(_, topics)| topics.iter().copied())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
  #[error("alias '{alias}' points to unknown topic '{target}'")]
  UnknownAliasTarget { alias: &'static str, target: &'static str },
  #[error("alias '{0}' is not lowercase")]
  AliasNotLowercase(&'static str),
  #[error("alias '{0}' is declared more than once")]
  DuplicateAlias(&'static str),
  #[error("category '{0}' has no topics")]
  EmptyCategory(&'static str),
}

/// Exact-spelling membership test against the flattened topic set.
pub fn is_canonical(topic: &str) -> bool {
  ALL_TOPICS.binary_search(&topic).is_ok()
}

/// Check the internal consistency the matcher and distributor rely on.
pub fn validate() -> Result<(), CatalogError> {
  validate_tables(CATALOG, ALIASES)
}

/// Every category non-empty; aliases lowercase, unique, and pointing at a listed topic.
pub fn validate_tables(
  catalog: &[(&'static str, &'static [&'static str])],
  aliases: &[(&'static str, &'static str)],
) -> Result<(), CatalogError> {
  if let Some(&(name, _)) = catalog.iter().find(|(_, topics)| topics.is_empty()) {
    return Err(CatalogError::EmptyCategory(name));
  }

  let topics: BTreeSet<&str> = catalog.iter().flat_map(|(_, ts)| ts.iter().copied()).collect();
  let mut seen = BTreeSet::new();
  for &(alias, target) in aliases {
    if alias != alias.to_lowercase() {
      return Err(CatalogError::AliasNotLowercase(alias));
    }
    if !seen.insert(alias) {
      return Err(CatalogError::DuplicateAlias(alias));
    }
    if !topics.contains(target) {
      return Err(CatalogError::UnknownAliasTarget { alias, target });
    }
  }
  Ok(())
}
