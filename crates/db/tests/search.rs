//! Integration tests for permission-filtered page search.

use pagewright_core::permission::{PermissionRule, PermissionSet};
use pagewright_db::models::page::CreatePage;
use pagewright_db::models::search::SearchParams;
use pagewright_db::repositories::{PageRepo, SearchRepo};
use sqlx::PgPool;

async fn seed(pool: &PgPool, path: &str, title: &str, body: &str, view: Option<&str>) {
    let input = CreatePage {
        title: title.to_string(),
        body: body.to_string(),
        view_rule: view.map(|v| PermissionRule::parse(v).unwrap()),
        modify_rule: None,
        summary: None,
    };
    PageRepo::create(pool, path, &input, None).await.unwrap();
}

fn query(q: &str) -> SearchParams {
    SearchParams {
        q: Some(q.to_string()),
        ..Default::default()
    }
}

fn paths(hits: &[pagewright_db::models::search::PageSearchHit]) -> Vec<&str> {
    let mut paths: Vec<&str> = hits.iter().map(|h| h.page.path.as_str()).collect();
    paths.sort_unstable();
    paths
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_hides_pages_caller_cannot_view(pool: PgPool) {
    seed(&pool, "/crabs", "Crabs", "Every rustacean loves crabs", None).await;
    seed(&pool, "/vault", "Vault", "A hidden rustacean", Some("sec")).await;
    seed(&pool, "/vault/inner", "Inner", "Nested rustacean", None).await;

    let anonymous = PermissionSet::anonymous();
    let hits = SearchRepo::search_pages(&pool, &query("rustacean"), &anonymous)
        .await
        .unwrap();
    assert_eq!(paths(&hits), vec!["/crabs"]);

    let (insider, rejected) = PermissionSet::from_claims(&["wikiView/sec"]);
    assert!(rejected.is_empty());
    let hits = SearchRepo::search_pages(&pool, &query("rustacean"), &insider)
        .await
        .unwrap();
    assert_eq!(paths(&hits), vec!["/crabs", "/vault", "/vault/inner"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_skips_deleted_pages(pool: PgPool) {
    seed(&pool, "/kept", "Kept", "penguin facts", None).await;
    seed(&pool, "/dropped", "Dropped", "penguin rumours", None).await;
    PageRepo::soft_delete(&pool, "/dropped", None).await.unwrap();

    let hits = SearchRepo::search_pages(&pool, &query("penguin"), &PermissionSet::anonymous())
        .await
        .unwrap();
    assert_eq!(paths(&hits), vec!["/kept"]);
    assert!(hits[0].matched.body.contains("<mark>"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_match_outranks_body_match(pool: PgPool) {
    seed(&pool, "/body", "Something else", "all about otters", None).await;
    seed(&pool, "/title", "Otters", "nothing relevant", None).await;

    let hits = SearchRepo::search_pages(&pool, &query("otters"), &PermissionSet::anonymous())
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].page.path, "/title");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_offset_and_limit_count_visible_hits(pool: PgPool) {
    for i in 0..3 {
        seed(&pool, &format!("/open{i}"), "Open", "walrus", None).await;
        seed(&pool, &format!("/closed{i}"), "Closed", "walrus", Some("sec")).await;
    }

    let params = SearchParams {
        q: Some("walrus".to_string()),
        limit: Some(2),
        offset: Some(1),
    };
    let hits = SearchRepo::search_pages(&pool, &params, &PermissionSet::anonymous())
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.page.path.starts_with("/open")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_query_returns_nothing(pool: PgPool) {
    seed(&pool, "/any", "Any", "text", None).await;
    let hits = SearchRepo::search_pages(&pool, &query("  !! "), &PermissionSet::anonymous())
        .await
        .unwrap();
    assert!(hits.is_empty());
}
