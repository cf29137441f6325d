use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
use uuid::Uuid;

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn post_model(id: Uuid, author_id: Uuid, comment_ids: Vec<Uuid>) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        author_id,
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        comment_ids,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id_keeps_comment_order() {
    let post_id = Uuid::new_v4();
    let comments = vec![Uuid::new_v4(), Uuid::new_v4()];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(
            post_id,
            Uuid::new_v4(),
            comments.clone(),
        )]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.comment_ids, comments);
}

#[tokio::test]
async fn test_find_posts_by_author() {
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(Uuid::new_v4(), author_id, vec![]),
            post_model(Uuid::new_v4(), author_id, vec![]),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.find_by_author(author_id).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.author_id == author_id));
}

#[tokio::test]
async fn test_find_user_by_email() {
    let now = chrono::Utc::now();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: user_id,
            username: "alice".to_owned(),
            email: "a@x.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            is_admin: false,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user: User = repo.find_by_email("a@x.com").await.unwrap().unwrap();

    assert_eq!(user.id, user_id);
    assert_eq!(user.username, "alice");
    assert!(!user.is_admin);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_query_failure_is_query_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
            "boom".to_owned(),
        ))])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.find_all().await;

    assert!(matches!(result, Err(RepoError::Query(_))));
}

#[tokio::test]
async fn test_attach_comment_is_a_single_array_append() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    repo.attach_comment(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();

    let log = format!("{:?}", repo.db.into_transaction_log());
    assert!(log.contains("array_append"));
    assert!(!log.contains("SELECT"));
}

#[tokio::test]
async fn test_attach_comment_to_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.attach_comment(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_detach_comment_reports_whether_removed() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let (post_id, comment_id) = (Uuid::new_v4(), Uuid::new_v4());

    assert!(repo.detach_comment(post_id, comment_id).await.unwrap());
    assert!(!repo.detach_comment(post_id, comment_id).await.unwrap());

    let log = format!("{:?}", repo.db.into_transaction_log());
    assert!(log.contains("array_remove"));
}
