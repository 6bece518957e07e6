use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod domain;
mod application;
mod infrastructure;

use application::idempotency::IdempotencyStore;
use application::use_cases::{DepartmentUseCase, EmployeeUseCase, ProductUseCase};
use domain::services::{DepartmentService, EmployeeService, ProductService};
use infrastructure::cache::ResponseCache;
use infrastructure::clients::{
    HttpDepartmentDirectory, HttpEmployeeDirectory, HttpStoreGateway, DEFAULT_CLIENT_TIMEOUT,
};
use infrastructure::config::{
    ServiceConfig, CONFIG_SERVER_PORT, DEPARTMENT_SERVICE_PORT, EMPLOYEE_SERVICE_PORT,
    PRODUCT_SERVICE_PORT,
};
use infrastructure::config_api::{self, ConfigServerState};
use infrastructure::department_api::{self, DepartmentApiState};
use infrastructure::employee_api::{self, EmployeeApiState};
use infrastructure::event_bus::{
    spawn_department_event_listener, spawn_employee_event_listener, spawn_notification_listener,
    InMemoryEventBus,
};
use infrastructure::persistence::{InMemoryDepartmentRepository, InMemoryEmployeeRepository};
use infrastructure::product_api::{self, ProductApiState};
use infrastructure::server::HttpServer;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the department service
    Department(ServiceArgs),
    /// Run the employee service
    Employee(ServiceArgs),
    /// Run the product catalog service
    Product(ServiceArgs),
    /// Run the config server
    ConfigServer(ConfigServerArgs),
}

#[derive(Args)]
struct ServiceArgs {
    /// Host to bind the service to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to bind the service to
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of a config server to fetch configuration from
    #[arg(long, conflicts_with = "config")]
    config_server: Option<String>,

    /// Configuration profile requested from the config server
    #[arg(long, requires = "config_server")]
    profile: Option<String>,
}

#[derive(Args)]
struct ConfigServerArgs {
    /// Host to bind the config server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the config server to
    #[arg(short, long, default_value_t = CONFIG_SERVER_PORT)]
    port: u16,

    /// Directory holding the per-application TOML documents
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Department(args) => {
            let config = resolve_config(&args, "department").await?;
            run_department(config).await
        }
        Command::Employee(args) => {
            let config = resolve_config(&args, "employee").await?;
            run_employee(config).await
        }
        Command::Product(args) => {
            let config = resolve_config(&args, "product").await?;
            run_product(config).await
        }
        Command::ConfigServer(args) => run_config_server(args).await,
    }
}

/// Defaults, then file or config-server document, then CLI overrides.
async fn resolve_config(args: &ServiceArgs, application: &str) -> anyhow::Result<ServiceConfig> {
    let mut config = if let Some(path) = &args.config {
        ServiceConfig::load_from_file(path)?
    } else if let Some(base_url) = &args.config_server {
        ServiceConfig::fetch_remote(base_url, application, args.profile.as_deref()).await?
    } else {
        ServiceConfig::default()
    };

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = Some(port);
    }
    Ok(config)
}

async fn run_department(config: ServiceConfig) -> anyhow::Result<()> {
    let port = config.server.port.unwrap_or(DEPARTMENT_SERVICE_PORT);
    info!("Starting department service");

    let bus = Arc::new(InMemoryEventBus::new());
    spawn_department_event_listener(&bus);
    spawn_notification_listener(&bus);

    let repo = Arc::new(InMemoryDepartmentRepository::new());
    let employees = Arc::new(HttpEmployeeDirectory::new(
        config.department.employee_service_url.clone(),
        DEFAULT_CLIENT_TIMEOUT,
    )?);
    let service = Arc::new(DepartmentService::new(repo, employees, bus));
    let departments = Arc::new(DepartmentUseCase::new(service));

    let app = department_api::router(DepartmentApiState { departments });
    HttpServer::bind(&config.server.host, port)
        .await?
        .serve(app)
        .await
}

async fn run_employee(config: ServiceConfig) -> anyhow::Result<()> {
    let port = config.server.port.unwrap_or(EMPLOYEE_SERVICE_PORT);
    info!("Starting employee service");

    let bus = Arc::new(InMemoryEventBus::new());
    spawn_employee_event_listener(&bus);
    spawn_department_event_listener(&bus);
    spawn_notification_listener(&bus);

    let repo = Arc::new(InMemoryEmployeeRepository::new());
    let departments = Arc::new(HttpDepartmentDirectory::new(
        config.employee.department_service_url.clone(),
        DEFAULT_CLIENT_TIMEOUT,
    )?);
    let service = Arc::new(EmployeeService::new(repo, bus));
    let employees = Arc::new(EmployeeUseCase::new(
        service,
        departments,
        IdempotencyStore::new(Duration::from_secs(config.idempotency.ttl_secs)),
    ));
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(config.cache.ttl_secs)));

    let app = employee_api::router(EmployeeApiState { employees, cache });
    HttpServer::bind(&config.server.host, port)
        .await?
        .serve(app)
        .await
}

async fn run_product(config: ServiceConfig) -> anyhow::Result<()> {
    let port = config.server.port.unwrap_or(PRODUCT_SERVICE_PORT);
    info!("Starting product service");

    let store = Arc::new(HttpStoreGateway::new(
        config.product.store_api_url.clone(),
        Duration::from_secs(config.product.request_timeout_secs),
    )?);
    let service = Arc::new(ProductService::new(store));
    let products = Arc::new(ProductUseCase::new(service));
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(config.cache.ttl_secs)));

    let app = product_api::router(ProductApiState { products, cache });
    HttpServer::bind(&config.server.host, port)
        .await?
        .serve(app)
        .await
}

async fn run_config_server(args: ConfigServerArgs) -> anyhow::Result<()> {
    info!(
        "Starting config server over {}",
        args.config_dir.display()
    );

    let app = config_api::router(ConfigServerState {
        config_dir: args.config_dir,
    });
    HttpServer::bind(&args.host, args.port)
        .await?
        .serve(app)
        .await
}
