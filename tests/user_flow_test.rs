mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use quizmaster_backend::utils::token::issue_token;

#[tokio::test]
async fn register_login_take_and_submit_quiz() {
    let Some(pool) = common::setup().await else {
        return;
    };
    let app = common::app(pool);
    let admin_token = issue_token(Uuid::new_v4(), "admin").unwrap();
    let tag = Uuid::new_v4().simple().to_string();

    // Registration
    let register_body = json!({
        "username": format!("student_{}", tag),
        "email": format!("student_{}@example.com", tag),
        "password": "hunter22",
        "full_name": "Test Student",
        "qualification": "BSc",
        "dob": "2000-01-15"
    });
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &register_body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same username again is a conflict
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &register_body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Wrong password is a generic 401
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({
                "username": format!("student_{}", tag),
                "password": "wrong-password",
                "user_type": "user"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({
                "username": format!("student_{}", tag),
                "password": "hunter22",
                "user_type": "user"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = common::body_json(response).await;
    assert_eq!(login["role"], "user");
    let user_token = login["token"].as_str().unwrap().to_string();

    // Admin sets up a quiz whose window covers the current moment
    let quiz_id = create_quiz_via_api(&app, &admin_token, &tag, Utc::now().date_naive()).await;

    // The catalog lists it as open
    let response = app
        .clone()
        .oneshot(common::get_request("/api/user/quizzes", Some(&user_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let catalog = common::body_json(response).await;
    let entry = catalog
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == json!(quiz_id))
        .expect("quiz in catalog");
    assert_eq!(entry["availability"], "open");
    assert_eq!(entry["question_count"], 2);

    // Taking the quiz never leaks correct answers
    let response = app
        .clone()
        .oneshot(common::get_request(
            &format!("/api/user/quizzes/{}", quiz_id),
            Some(&user_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let take = common::body_json(response).await;
    let questions = take["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    for q in questions {
        assert!(q.get("correct_option").is_none());
    }

    // Answer key via the admin endpoint, then submit everything correct
    let response = app
        .clone()
        .oneshot(common::get_request(
            &format!("/api/admin/quizzes/{}", quiz_id),
            Some(&admin_token),
        ))
        .await
        .unwrap();
    let detail = common::body_json(response).await;
    let answers: Vec<_> = detail["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| {
            json!({
                "question_id": q["id"],
                "selected_option": q["correct_option"]
            })
        })
        .collect();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/user/quizzes/{}/submit", quiz_id),
            Some(&user_token),
            &json!({ "answers": answers }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = common::body_json(response).await;
    assert_eq!(result["total_score"], 2);
    assert_eq!(result["max_score"], 2);
    assert_eq!(result["percentage"], 100.0);

    // Score history shows the attempt
    let response = app
        .clone()
        .oneshot(common::get_request("/api/user/scores", Some(&user_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history = common::body_json(response).await;
    assert!(history
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["quiz_id"] == json!(quiz_id)));

    // Dashboard aggregates exist for the user
    let response = app
        .oneshot(common::get_request(
            "/api/user/dashboard",
            Some(&user_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let dashboard = common::body_json(response).await;
    assert_eq!(dashboard["user"]["username"], format!("student_{}", tag));
    assert!(dashboard["stats"]["performance"].is_array());
}

#[tokio::test]
async fn quizzes_outside_their_window_cannot_be_taken() {
    let Some(pool) = common::setup().await else {
        return;
    };
    let app = common::app(pool);
    let admin_token = issue_token(Uuid::new_v4(), "admin").unwrap();
    let user_token = issue_token(Uuid::new_v4(), "user").unwrap();
    let tag = Uuid::new_v4().simple().to_string();

    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let quiz_id = create_quiz_via_api(&app, &admin_token, &tag, yesterday).await;

    let response = app
        .clone()
        .oneshot(common::get_request(
            &format!("/api/user/quizzes/{}", quiz_id),
            Some(&user_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "quiz_closed");

    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/user/quizzes/{}/submit", quiz_id),
            Some(&user_token),
            &json!({ "answers": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn submit_rejects_out_of_range_selected_option() {
    let Some(pool) = common::setup().await else {
        return;
    };
    let app = common::app(pool);
    let user_token = issue_token(Uuid::new_v4(), "user").unwrap();

    // Validation fires before the quiz lookup, so the id can be arbitrary.
    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/user/quizzes/{}/submit", Uuid::new_v4()),
            Some(&user_token),
            &json!({
                "answers": [
                    { "question_id": Uuid::new_v4(), "selected_option": 0 }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_routes_require_a_user_token() {
    let Some(pool) = common::setup().await else {
        return;
    };
    let app = common::app(pool);

    let response = app
        .clone()
        .oneshot(common::get_request("/api/user/quizzes", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let admin_token = issue_token(Uuid::new_v4(), "admin").unwrap();
    let response = app
        .oneshot(common::get_request(
            "/api/user/quizzes",
            Some(&admin_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

async fn create_quiz_via_api(
    app: &axum::Router,
    admin_token: &str,
    tag: &str,
    date: chrono::NaiveDate,
) -> String {
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/admin/subjects",
            Some(admin_token),
            &json!({ "name": format!("Subject {}", tag) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let subject = common::body_json(response).await;
    let subject_id = subject["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/admin/subjects/{}/chapters", subject_id),
            Some(admin_token),
            &json!({ "name": format!("Chapter {}", tag) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let chapter = common::body_json(response).await;
    let chapter_id = chapter["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/admin/chapters/{}/quizzes", chapter_id),
            Some(admin_token),
            &json!({
                "date_of_quiz": date,
                "start_time": "00:00:00",
                "end_time": "23:59:59",
                "duration_minutes": 20,
                "questions": [
                    {
                        "statement": "Pick option two",
                        "option1": "a", "option2": "b", "option3": "c", "option4": "d",
                        "correct_option": 2
                    },
                    {
                        "statement": "Pick option four",
                        "option1": "a", "option2": "b", "option3": "c", "option4": "d",
                        "correct_option": 4
                    }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let quiz = common::body_json(response).await;
    quiz["id"].as_str().unwrap().to_string()
}
