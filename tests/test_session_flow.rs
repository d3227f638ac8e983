//! Integration tests for the session lifecycle: login, prompt rendering,
//! inactivity sign-out and teardown ordering.

mod fixtures;

use bastion_shell::{AuthState, DispatchMode};
use fixtures::*;

#[test]
fn login_then_prompt_with_role_marker() {
    let mut shell = create_shell(DispatchMode::Queued);
    shell.activate().unwrap();
    assert!(shell.io_mut().take().contains("login:"));

    feed_str(&mut shell, USER_NAME);
    shell.feed(b'\r').unwrap();
    assert!(shell.io_mut().take().contains("password:"));

    feed_str(&mut shell, USER_PASSWORD);
    shell.feed(b'\r').unwrap();
    shell.auth_tick().unwrap();
    let out = shell.io_mut().take();
    assert!(out.contains("Authorization complete"));
    assert!(out.contains("operator>"));
    assert_eq!(shell.registry().depth(), 1);
}

#[test]
fn admin_login_uses_hash_marker() {
    let mut shell = create_shell(DispatchMode::Queued);
    login(&mut shell, ADMIN_NAME, ADMIN_PASSWORD);
    assert!(shell.session().is_admin());

    feed_str(&mut shell, "reboot\r");
    shell.process_next().unwrap();
    let out = shell.io_mut().take();
    assert!(out.contains("rebooting"));
    assert!(out.contains("root_op#"));
}

#[test]
fn admin_command_invisible_to_plain_user() {
    let mut shell = create_shell(DispatchMode::Queued);
    login(&mut shell, USER_NAME, USER_PASSWORD);
    feed_str(&mut shell, "reboot\r");
    shell.process_next().unwrap();
    assert!(shell.io_mut().take().contains("Command not recognised"));
}

#[test]
fn password_is_never_echoed() {
    let mut shell = create_shell(DispatchMode::Queued);
    feed_str(&mut shell, USER_NAME);
    shell.feed(b'\r').unwrap();
    shell.io_mut().take();
    feed_str(&mut shell, USER_PASSWORD);
    let out = shell.io_mut().take();
    assert!(!out.contains(USER_PASSWORD));
    assert_eq!(out, "*".repeat(USER_PASSWORD.len()));
}

#[test]
fn failed_login_recovers_to_username_entry() {
    let mut shell = create_shell(DispatchMode::Queued);
    feed_str(&mut shell, "operator\rbadpass\r");
    shell.auth_tick().unwrap();
    let out = shell.io_mut().take();
    assert!(out.contains("Incorrect login or password"));
    assert!(out.contains("login:"));
    assert_eq!(shell.session().state(), AuthState::AwaitingUsername);

    // A correct login still works afterwards.
    login(&mut shell, USER_NAME, USER_PASSWORD);
    assert!(shell.session().is_authenticated());
}

#[test]
fn inactivity_timeout_signs_out_via_poll() {
    let mut shell = create_shell(DispatchMode::Polled);
    shell.config_mut().signout_secs = 5;
    login(&mut shell, USER_NAME, USER_PASSWORD);

    for _ in 0..4 {
        shell.poll(1000).unwrap();
    }
    assert!(shell.session().is_authenticated());
    shell.poll(1000).unwrap();
    let out = shell.io_mut().take();
    assert!(out.contains("Sign out (Inactivity period exceeded)"));
    assert!(out.contains("login:"));
    assert_eq!(shell.registry().depth(), 0);
}

#[test]
fn activity_resets_the_timeout() {
    let mut shell = create_shell(DispatchMode::Polled);
    shell.config_mut().signout_secs = 3;
    login(&mut shell, USER_NAME, USER_PASSWORD);

    shell.poll(2000).unwrap();
    shell.feed(b'x').unwrap();
    shell.poll(2000).unwrap();
    assert!(shell.session().is_authenticated());
    shell.poll(1000).unwrap();
    assert!(!shell.session().is_authenticated());
}

#[test]
fn signout_discards_queued_lines() {
    let mut shell = create_shell(DispatchMode::Queued);
    login(&mut shell, USER_NAME, USER_PASSWORD);

    feed_str(&mut shell, "signout\r");
    feed_str(&mut shell, "status\r");
    shell.process_next().unwrap();
    shell.io_mut().take();

    // The queued "status" line died with the session.
    login(&mut shell, USER_NAME, USER_PASSWORD);
    assert!(!shell.process_next().unwrap());
}
