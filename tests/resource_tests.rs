//! Integration tests for the endpoint catalogs.
//!
//! These tests check that each resource client builds the expected route and
//! body and binds the response to its record type.

use std::collections::BTreeMap;

use atomic_api::rest::resources::{
    BackupKind, LogQuery, MetricFilter, MetricsQuery, MetricsScope, NewSshUser, NewTask,
    PersistentDataAction, SoftwareAction,
};
use atomic_api::{ApiKey, AtomicClient, AtomicConfig, BaseUrl, ClientId, ErrorKind, SiteRef};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AtomicClient {
    let config = AtomicConfig::builder()
        .api_key(ApiKey::new("test-key").unwrap())
        .client_id(ClientId::new("agency").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    AtomicClient::new(&config).unwrap()
}

// ============================================================================
// Sites
// ============================================================================

#[tokio::test]
async fn test_list_sites_keeps_order_and_unknown_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-sites/agency"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"atomic_site_id": 20, "domain_name": "b.example.com", "server_pool_id": 3},
                {"atomic_site_id": 10, "domain_name": "a.example.com"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sites = client.sites().list(Some(2), None).await.unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].atomic_site_id, 20);
    assert_eq!(sites[1].domain_name, "a.example.com");
    assert_eq!(sites[0].unknown["server_pool_id"], json!(3));
}

#[tokio::test]
async fn test_get_site_binds_record_and_keeps_extras() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-site/example.com/extra"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "atomic_site_id": 7,
                "domain_name": "example.com",
                "php_version": "8.3",
                "db_pass": "",
                "extra": {"server": "dfw"},
                "space_used": 1024
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let site = client.sites().get("example.com", true).await.unwrap();

    assert_eq!(site.atomic_site_id, 7);
    assert_eq!(site.php_version.as_deref(), Some("8.3"));
    assert!(site.db_pass.is_none());
    assert_eq!(site.extra.unwrap()["server"], "dfw");
    assert_eq!(site.unknown["space_used"], json!(1024));
}

#[tokio::test]
async fn test_get_site_binds_full_record_with_integer_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-site/4711"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "atomic_site_id": 4711,
                "wpcom_blog_id": "",
                "domain_name": "shop.example.com",
                "server_pool_id": 12,
                "db_pass": "s3cret",
                "cache_prefix": "a4711_",
                "wp_admin_user": "admin",
                "wp_admin_email": "admin@example.com",
                "db_charset": "utf8mb4",
                "db_collate": "",
                "php_version": "8.2",
                "wp_version": "",
                "migrate_to_pool": "",
                "migrate_readonly": 0,
                "photon_subsizes": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let site = client.sites().get(4711_u64, false).await.unwrap();

    assert_eq!(site.atomic_site_id, 4711);
    assert!(site.wpcom_blog_id.is_none());
    assert_eq!(site.server_pool_id, Some(12));
    assert_eq!(site.cache_prefix.as_deref(), Some("a4711_"));
    assert!(site.db_collate.is_none());
    assert!(site.wp_version.is_none());
    assert!(site.migrate_to_pool.is_none());
    assert_eq!(site.migrate_readonly, Some(false));
    assert_eq!(site.photon_subsizes, Some(true));
    assert!(site.extra.is_none());
    assert!(site.unknown.is_empty());
}

#[tokio::test]
async fn test_update_persistent_data_sends_value_and_delete_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/site-persist-data/4711"))
        .and(body_string_contains("data%5Bfoo%5D%5Bvalue%5D=some+data"))
        .and(body_string_contains("data%5Bbar%5D%5Bdelete%5D=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"job_id": 88}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut changes = BTreeMap::new();
    changes.insert(
        "foo".to_string(),
        PersistentDataAction::Set("some data".to_string()),
    );
    changes.insert("bar".to_string(), PersistentDataAction::Delete);

    let client = client_for(&server);
    let job = client
        .sites()
        .update_persistent_data(4711, &changes)
        .await
        .unwrap();
    assert_eq!(job.id().as_str(), "88");
}

#[tokio::test]
async fn test_check_can_host_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check-can-host-domain/agency/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"allowed": false}})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.sites().check_can_host_domain("example.com").await.unwrap());
}

#[tokio::test]
async fn test_alias_routes_use_domain_service_for_domains() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/site-alias/domain/example.com/add/www.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"domains": ["example.com", "www.example.com"]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/site-alias/agency/7/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"domains": ["example.com"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let sites = client.sites();

    let aliases = sites.add_alias("example.com", "www.example.com").await.unwrap();
    assert_eq!(aliases, vec!["example.com", "www.example.com"]);

    let aliases = sites.list_aliases(7_u64).await.unwrap();
    assert_eq!(aliases, vec!["example.com"]);
}

#[tokio::test]
async fn test_manage_software_sends_bracketed_actions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/site-manage-software/atomic/7"))
        .and(body_string_contains("plugins%2Fakismet%2Flatest=activate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "sw-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut actions = BTreeMap::new();
    actions.insert("plugins/akismet/latest".to_string(), SoftwareAction::Activate);

    let job = client.sites().manage_software(7, &actions).await.unwrap();
    assert_eq!(job.id().as_str(), "sw-1");
}

#[tokio::test]
async fn test_site_logs_post_data_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/site-logs/example.com"))
        .and(body_string_contains("data%5Bstart%5D=100"))
        .and(body_string_contains("data%5Bfilter%5D%5Bstatus%5D%5B%5D=500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"logs": [{"status": 500}], "total_results": 1, "scroll_id": "s-2"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = LogQuery::new(100, 200).filter("status", "500");
    let page = client.sites().get_logs("example.com", &query).await.unwrap();

    assert_eq!(page.logs.len(), 1);
    assert_eq!(page.scroll_id.as_deref(), Some("s-2"));
}

// ============================================================================
// Backups
// ============================================================================

#[tokio::test]
async fn test_list_backups_filters_by_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/site-backups-list/agency/7/fs/db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "atomic_backup_id": 1,
                    "atomic_site_id": 7,
                    "backup_timestamp": 1_700_000_000,
                    "type": "fs"
                },
                {
                    "atomic_backup_id": "2",
                    "atomic_site_id": "7",
                    "backup_timestamp": "2024-05-01 12:00:00",
                    "type": "db"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let backups = client
        .backups()
        .list(7_u64, &[BackupKind::Filesystem, BackupKind::Database])
        .await
        .unwrap();

    assert_eq!(backups.len(), 2);
    assert_eq!(backups[0].atomic_backup_id, "1");
    assert_eq!(backups[0].kind, BackupKind::Filesystem);
    assert_eq!(backups[1].kind, BackupKind::Database);
    assert_eq!(backups[0].backup_timestamp.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn test_download_backup_returns_raw_bytes() {
    let server = MockServer::start().await;
    let archive = vec![0x42, 0x5a, 0x68, 0x39, 0x00, 0xff];
    Mock::given(method("GET"))
        .and(path("/site-backup-get/agency/7/b-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/site-backup-get/agency/7/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let backups = client.backups();

    assert_eq!(backups.download(7_u64, "b-1").await.unwrap(), archive);

    let error = backups.download(7_u64, "missing").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

// ============================================================================
// SSH
// ============================================================================

#[tokio::test]
async fn test_add_ssh_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ssh-user/agency/7/add"))
        .and(body_string_contains("user=deploy"))
        .and(body_string_contains("pkey=ssh-ed25519"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"user": "deploy", "pass": ""}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let user = client
        .ssh()
        .add_user(7_u64, &NewSshUser::new("deploy").public_key("ssh-ed25519 AAAA"))
        .await
        .unwrap();

    assert_eq!(user.user, "deploy");
    assert!(user.pass.is_none());
}

#[tokio::test]
async fn test_list_ssh_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ssh-user/domain/example.com/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["deploy", "ops"]})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let users = client.ssh().list_users("example.com").await.unwrap();
    assert_eq!(users, vec!["deploy", "ops"]);
}

// ============================================================================
// Metrics, Tasks and Edge Cache
// ============================================================================

#[tokio::test]
async fn test_metrics_query_posts_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/metrics/site/7"))
        .and(body_string_contains("metric%5B%5D=requests"))
        .and(body_string_contains("dimension%5B%5D=http_host"))
        .and(body_string_contains("filters%5B0%5D%5Bcolumn%5D=request_method"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"periods": [{"timestamp": 1, "dimension": {"example.com": 3}}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = MetricsQuery::new(1, 2)
        .metric("requests")
        .dimension("http_host")
        .filter(MetricFilter::new("request_method", "=", "POST"));
    let result = client
        .metrics()
        .query(&MetricsScope::Site(SiteRef::Id(7)), &query)
        .await
        .unwrap();

    assert_eq!(result["periods"][0]["timestamp"], json!(1));
}

#[tokio::test]
async fn test_metrics_query_without_metric_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = MetricsQuery::new(1, 2).dimension("http_host");
    let error = client
        .metrics()
        .query(&MetricsScope::Client(None), &query)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn test_create_wp_cli_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/task-create/agency/run-wp-cli-command"))
        .and(body_string_contains("args%5B%5D=db&args%5B%5D=size"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"task_id": 4, "initial_task_manager_id": 9}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .tasks()
        .create(&NewTask::wp_cli(["db", "size"]))
        .await
        .unwrap();

    assert_eq!(created.task_id, 4);
    assert_eq!(created.initial_task_manager_id, 9);
}

#[tokio::test]
async fn test_task_without_required_input_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .tasks()
        .create(&NewTask::find_files("  "))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn test_edge_cache_status_and_purge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/edge-cache/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"status": 1, "status_name": "Enabled", "ddos_until": 0}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/edge-cache/7/purge"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let edge_cache = client.edge_cache();

    let status = edge_cache.get_status(7_u64).await.unwrap();
    assert_eq!(status.status, Some(1));
    assert_eq!(status.status_name.as_deref(), Some("Enabled"));
    assert_eq!(status.ddos_until, Some(0));

    assert_eq!(edge_cache.purge(7_u64).await.unwrap(), json!(true));
}
