use axum::http::StatusCode;
use axum_test::TestServer;
use notekeep::api::create_router;
use notekeep_core::models::*;
use notekeep_core::Database;
use serde_json::json;

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.ensure_schema().expect("Failed to migrate");
    let app = create_router(db);
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_tag(server: &TestServer, name: &str, color: &str) -> Tag {
    server
        .post("/api/tags")
        .json(&CreateTagInput {
            name: name.to_string(),
            color: color.to_string(),
        })
        .await
        .json::<Tag>()
}

async fn create_note(server: &TestServer, title: &str, note_type: &str, tags: &[&str]) -> Note {
    server
        .post("/api/notes")
        .json(&json!({
            "title": title,
            "content": format!("{title} body"),
            "type": note_type,
            "tag_names": tags,
        }))
        .await
        .json::<Note>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();

        let response = server.get("/api/health").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

mod folders {
    use super::*;

    #[tokio::test]
    async fn creates_and_lists_folders() {
        let server = setup();

        let response = server
            .post("/api/folders")
            .json(&json!({ "id": "work", "name": "Work" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let folders: Vec<Folder> = server.get("/api/folders").await.json();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].id, "work");
        assert_eq!(folders[0].note_count, 0);
    }

    #[tokio::test]
    async fn rejects_duplicate_folder_id() {
        let server = setup();
        let body = json!({ "id": "work", "name": "Work" });
        server.post("/api/folders").json(&body).await;

        let response = server.post("/api/folders").json(&body).await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn renames_folder() {
        let server = setup();
        server
            .post("/api/folders")
            .json(&json!({ "id": "work", "name": "Work" }))
            .await;

        let response = server
            .put("/api/folders/work")
            .json(&json!({ "name": "Job" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Folder>().name, "Job");
    }

    #[tokio::test]
    async fn returns_404_when_renaming_missing_folder() {
        let server = setup();

        server
            .put("/api/folders/missing")
            .json(&json!({ "name": "x" }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn deleting_folder_keeps_its_notes() {
        let server = setup();
        server
            .post("/api/folders")
            .json(&json!({ "id": "work", "name": "Work" }))
            .await;
        let note: Note = server
            .post("/api/notes")
            .json(&json!({
                "title": "Filed",
                "content": "x",
                "type": "text",
                "folder_id": "work",
            }))
            .await
            .json();

        server
            .delete("/api/folders/work")
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete("/api/folders/work")
            .await
            .assert_status_not_found();

        let response = server.get(&format!("/api/notes/{}", note.id)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Note>().folder_id.as_deref(), Some("work"));
    }
}

mod tags {
    use super::*;

    #[tokio::test]
    async fn lists_tags_by_name() {
        let server = setup();
        create_tag(&server, "zeta", "red").await;
        create_tag(&server, "alpha", "blue").await;

        let tags: Vec<Tag> = server.get("/api/tags").await.json();

        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_tag_name() {
        let server = setup();
        create_tag(&server, "python", "green").await;

        let response = server
            .post("/api/tags")
            .json(&json!({ "name": "python", "color": "blue" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert!(response.text().contains("python"));
    }
}

mod notes {
    use super::*;

    #[tokio::test]
    async fn creates_note_with_tags() {
        let server = setup();
        create_tag(&server, "python", "green").await;

        let response = server
            .post("/api/notes")
            .json(&json!({
                "title": "Setup",
                "content": "print(1)",
                "type": "code",
                "tag_names": ["python", "unknown"],
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let note: Note = response.json();
        assert_eq!(note.note_type, NoteType::Code);
        assert_eq!(
            note.tags,
            vec![NoteTag {
                name: "python".to_string(),
                color: "green".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn rejects_unknown_note_type() {
        let server = setup();

        let response = server
            .post("/api/notes")
            .json(&json!({ "title": "Poem", "content": "x", "type": "poem" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn returns_404_for_missing_note() {
        let server = setup();

        server.get("/api/notes/missing").await.assert_status_not_found();
        server
            .put("/api/notes/missing")
            .json(&json!({ "title": "x" }))
            .await
            .assert_status_not_found();
        server
            .delete("/api/notes/missing")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn updates_only_supplied_fields() {
        let server = setup();
        create_tag(&server, "todo", "orange").await;
        let note = create_note(&server, "Chores", "list", &["todo"]).await;

        let response = server
            .put(&format!("/api/notes/{}", note.id))
            .json(&json!({ "title": "Weekend chores" }))
            .await;

        response.assert_status_ok();
        let updated: Note = response.json();
        assert_eq!(updated.title, "Weekend chores");
        assert_eq!(updated.content, note.content);
        assert_eq!(updated.tag_names(), vec!["todo"]);
    }

    #[tokio::test]
    async fn clears_tags_with_empty_list() {
        let server = setup();
        create_tag(&server, "todo", "orange").await;
        let note = create_note(&server, "Chores", "list", &["todo"]).await;

        let updated: Note = server
            .put(&format!("/api/notes/{}", note.id))
            .json(&json!({ "tag_names": [] }))
            .await
            .json();

        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn deletes_note() {
        let server = setup();
        let note = create_note(&server, "Temp", "text", &[]).await;

        server
            .delete(&format!("/api/notes/{}", note.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/notes/{}", note.id))
            .await
            .assert_status_not_found();
    }
}

mod note_listing {
    use super::*;

    #[tokio::test]
    async fn filters_by_tag_and_keeps_all_tags() {
        let server = setup();
        create_tag(&server, "t", "red").await;
        create_tag(&server, "u", "blue").await;
        create_note(&server, "Both", "text", &["t", "u"]).await;
        create_note(&server, "OnlyU", "text", &["u"]).await;

        let response = server.get("/api/notes").add_query_param("tag", "t").await;

        response.assert_status_ok();
        let notes: Vec<Note> = response.json();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Both");
        assert_eq!(notes[0].tags.len(), 2);
    }

    #[tokio::test]
    async fn filters_by_folder_and_search() {
        let server = setup();
        server
            .post("/api/notes")
            .json(&json!({
                "title": "Deploy",
                "content": "cargo build --release",
                "type": "code",
                "folder_id": "work",
            }))
            .await;
        create_note(&server, "Deploy notes", "text", &[]).await;

        let notes: Vec<Note> = server
            .get("/api/notes")
            .add_query_param("folder_id", "work")
            .add_query_param("search", "release")
            .await
            .json();

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Deploy");
    }

    #[tokio::test]
    async fn returns_everything_without_filters() {
        let server = setup();
        create_note(&server, "A", "text", &[]).await;
        create_note(&server, "B", "list", &[]).await;

        let notes: Vec<Note> = server.get("/api/notes").await.json();

        assert_eq!(notes.len(), 2);
    }
}

mod note_history {
    use super::*;

    #[tokio::test]
    async fn tracks_code_note_versions() {
        let server = setup();
        let note = create_note(&server, "Script", "code", &[]).await;

        server
            .put(&format!("/api/notes/{}", note.id))
            .json(&json!({ "content": "print(2)" }))
            .await
            .assert_status_ok();

        let response = server.get(&format!("/api/notes/{}/history", note.id)).await;

        response.assert_status_ok();
        let history: Vec<HistoryEntry> = response.json();
        let versions: Vec<i64> = history.iter().map(|h| h.version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert_eq!(history[1].content, "print(2)");

        let found: Vec<Note> = server
            .get("/api/notes")
            .add_query_param("search", "print(2)")
            .await
            .json();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, note.id);
    }

    #[tokio::test]
    async fn text_notes_have_empty_history() {
        let server = setup();
        let note = create_note(&server, "Prose", "text", &[]).await;

        let history: Vec<HistoryEntry> = server
            .get(&format!("/api/notes/{}/history", note.id))
            .await
            .json();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn returns_404_for_missing_note() {
        let server = setup();

        server
            .get("/api/notes/missing/history")
            .await
            .assert_status_not_found();
    }
}
