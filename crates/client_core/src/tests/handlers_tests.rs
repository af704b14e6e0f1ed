use super::*;
use crate::{
    gateway::Aggregate,
    test_support::{ada, hobby, home_fixture, FakeGateway, Scripted},
    views::RowAction,
};

#[tokio::test]
async fn added_hobby_is_appended_without_refetching_the_list() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    gateway.script(&gateway.hobbies, Scripted::Ok(vec![hobby(1, "Go")]));
    gateway.script(&gateway.add_hobby, Scripted::Ok(HobbyId(42)));
    let (page, screen) = home_fixture(gateway.clone());
    page.load().await;
    screen.hobby_input.set_value("Chess");

    let outcome = page.handlers().submit_hobby().await;

    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(screen.hobby_list.labels(), vec!["Go", "Chess"]);
    assert_eq!(
        screen.hobby_list.rows().last().and_then(|row| row.action),
        Some(RowAction::RemoveHobby(HobbyId(42)))
    );
    assert_eq!(screen.hobby_input.value(), "");
    assert_eq!(gateway.calls_to("get_user_hobbies"), 1);
    assert!(screen.alerts.raised().is_empty());
}

#[tokio::test]
async fn added_hobby_refreshes_both_aggregates() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    let (page, screen) = home_fixture(gateway.clone());
    page.load().await;
    gateway.with_aggregate(
        Aggregate::MostCommonUser,
        Scripted::Ok(shared::domain::UserRef {
            username: "dora".to_string(),
        }),
    );

    page.handlers().add_hobby("Chess").await;

    assert_eq!(gateway.calls_to("most_common_user"), 2);
    assert_eq!(gateway.calls_to("most_common_user_never_met"), 2);
    assert_eq!(
        screen.most_common_user.markup(),
        "Most common user: <a href=\"/user/dora\">dora</a>"
    );
}

#[tokio::test]
async fn rejected_add_alerts_server_message() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    gateway.script(
        &gateway.add_hobby,
        Scripted::Rejected(Some("Hobby already exists for this user!".to_string())),
    );
    let (page, screen) = home_fixture(gateway.clone());
    screen.hobby_input.set_value("Chess");

    let outcome = page.handlers().submit_hobby().await;

    assert_eq!(
        outcome,
        MutationOutcome::Rejected("Hobby already exists for this user!".to_string())
    );
    assert_eq!(
        screen.alerts.raised(),
        vec!["Hobby already exists for this user!"]
    );
    assert_eq!(screen.hobby_input.value(), "Chess");
    assert!(screen.hobby_list.is_empty());
}

#[tokio::test]
async fn rejected_add_without_message_uses_fallback() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    gateway.script(&gateway.add_hobby, Scripted::Rejected(None));
    let (page, screen) = home_fixture(gateway.clone());

    page.handlers().add_hobby("").await;

    assert_eq!(screen.alerts.raised(), vec![ADD_HOBBY_FALLBACK]);
    assert_eq!(gateway.calls(), vec!["add_hobby/"]);
}

#[tokio::test]
async fn unreachable_backend_is_logged_not_alerted() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    gateway.script(&gateway.add_hobby, Scripted::Unreachable);
    let (page, screen) = home_fixture(gateway.clone());

    assert_eq!(
        page.handlers().add_hobby("Chess").await,
        MutationOutcome::Failed
    );
    assert!(screen.alerts.raised().is_empty());
}

#[tokio::test]
async fn removed_hobby_triggers_full_refetch() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    gateway.script(
        &gateway.hobbies,
        Scripted::Ok(vec![hobby(1, "Go"), hobby(42, "Chess")]),
    );
    let (page, screen) = home_fixture(gateway.clone());
    page.load().await;
    gateway.script(&gateway.hobbies, Scripted::Ok(vec![hobby(1, "Go")]));

    let outcome = page.activate(RowAction::RemoveHobby(HobbyId(42))).await;

    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(gateway.calls_to("remove_hobby"), 1);
    assert_eq!(gateway.calls_to("get_user_hobbies"), 2);
    assert_eq!(gateway.calls_to("most_common_user"), 2);
    assert_eq!(gateway.calls_to("most_common_user_never_met"), 2);
    assert!(screen
        .hobby_list
        .rows()
        .iter()
        .all(|row| row.action != Some(RowAction::RemoveHobby(HobbyId(42)))));
}

#[tokio::test]
async fn rejected_remove_alerts_and_keeps_list() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    gateway.script(&gateway.hobbies, Scripted::Ok(vec![hobby(42, "Chess")]));
    gateway.script(&gateway.remove_hobby, Scripted::Rejected(None));
    let (page, screen) = home_fixture(gateway.clone());
    page.load().await;

    page.handlers().remove_hobby(HobbyId(42)).await;

    assert_eq!(screen.alerts.raised(), vec![REMOVE_HOBBY_FALLBACK]);
    assert_eq!(screen.hobby_list.labels(), vec!["Chess"]);
    assert_eq!(gateway.calls_to("get_user_hobbies"), 1);
}

#[tokio::test]
async fn cancelled_meeting_refreshes_meetings_and_never_met() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    let (page, _screen) = home_fixture(gateway.clone());
    page.load().await;

    let outcome = page.activate(RowAction::CancelOneOnOne(MeetingId(7))).await;

    assert_eq!(outcome, MutationOutcome::Applied);
    assert_eq!(gateway.calls_to("cancel_one_on_one"), 1);
    assert_eq!(gateway.calls_to("get_user_one_on_ones"), 2);
    assert_eq!(gateway.calls_to("most_common_user_never_met"), 2);
    assert_eq!(gateway.calls_to("most_common_user"), 1);
}

#[tokio::test]
async fn rejected_cancel_alerts_and_skips_refresh() {
    let gateway = Arc::new(FakeGateway::logged_in(ada()));
    gateway.script(
        &gateway.cancel_one_on_one,
        Scripted::Rejected(Some("Meeting not found".to_string())),
    );
    let (page, screen) = home_fixture(gateway.clone());
    page.load().await;

    let outcome = page.handlers().cancel_one_on_one(MeetingId(7)).await;

    assert_eq!(
        outcome,
        MutationOutcome::Rejected("Meeting not found".to_string())
    );
    assert_eq!(screen.alerts.raised(), vec!["Meeting not found"]);
    assert_eq!(gateway.calls_to("get_user_one_on_ones"), 1);
}
