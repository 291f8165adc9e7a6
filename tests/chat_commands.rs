//! Integration tests for chat commands: persisted list, aliases,
//! authorization, media intents, and built-in dispatch.

mod common;

use celeste::commands::CommandType;
use celeste::dispatch::Dispatcher;
use celeste::fader::{SoftwareVolume, VolumeControl};
use celeste::receivers::{Event, Output};
use common::{ADMIN, TestBot};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn media_bot() -> TestBot {
    let dir = tempfile::TempDir::new().unwrap();
    let clips = dir.path().join("clips");
    std::fs::create_dir(&clips).unwrap();
    std::fs::write(clips.join("one.mp4"), b"").unwrap();
    std::fs::write(clips.join("notes.txt"), b"").unwrap();

    let records = json!([
        {
            "name": "hype",
            "description": "Random hype clip",
            "type": "video",
            "randomPath": true,
            "path": clips,
            "aliases": ["h", "hypehype"]
        },
        {
            "name": "boo",
            "description": "Boo the streamer",
            "type": "AUDIO",
            "path": "/media/boo.wav",
            "message": "booed the stream"
        },
        {
            "name": "intro",
            "description": "Intro video",
            "type": "video",
            "path": "/media/intro.mp4",
            "protected": true
        }
    ]);
    let mut bot = TestBot::in_dir(dir, records);
    bot.handshake();
    bot
}

fn without_echo(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|e| !matches!(e, Event::Print(Output::Chat(_)) | Event::Arrival(_)))
        .collect()
}

// ============================================================================
// Persisted commands
// ============================================================================

#[test]
fn persisted_commands_are_loaded_with_builtins() {
    let bot = media_bot();
    let registry = bot.session.chat().registry();
    assert_eq!(registry.len(), 8);
    assert_eq!(registry.resolve("h").map(|c| c.name()), Some("hype"));
    assert_eq!(registry.resolve("boo").map(|c| c.kind()), Some(CommandType::Audio));
    assert!(registry.resolve("Hype").is_none());
}

#[test]
fn random_video_via_alias() {
    let mut bot = media_bot();
    let events = without_echo(bot.say("ahri", "!hypehype"));
    match &events[..] {
        [Event::PlayVideo(path)] => assert!(path.ends_with("one.mp4")),
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn audio_carries_sender_and_message() {
    let mut bot = media_bot();
    let events = without_echo(bot.say("ahri", "!boo now"));
    assert_eq!(
        events,
        [Event::PlayAudio {
            sender: "ahri".into(),
            message: "booed the stream".into(),
            path: "/media/boo.wav".into(),
        }]
    );
}

#[test]
fn protected_persisted_command_requires_administrator() {
    let mut bot = media_bot();
    let events = bot.say("ahri", "!intro");
    assert!(matches!(events.last(), Some(Event::Alert(text)) if text.contains("intro")));
    assert!(!events.iter().any(|e| matches!(e, Event::PlayVideo(_))));

    let events = without_echo(bot.say(ADMIN, "!intro"));
    assert_eq!(events, [Event::PlayVideo("/media/intro.mp4".into())]);
}

#[test]
fn unknown_command_is_plain_chat() {
    let mut bot = media_bot();
    assert!(without_echo(bot.say("ahri", "!nothing here")).is_empty());
}

#[test]
fn missing_list_is_created_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("commands.json");
    let session = common::build_session(&path);
    assert!(path.exists());
    assert_eq!(session.chat().registry().len(), 5);
}

// ============================================================================
// Built-in dispatch
// ============================================================================

#[tokio::test]
async fn volume_from_chat_fades_output() {
    let mut bot = media_bot();
    let output = Arc::new(SoftwareVolume::new(50));
    let mut dispatcher = Dispatcher::new(output.clone(), Duration::from_secs(5));

    let events = without_echo(bot.say(ADMIN, "!volume 20 0"));
    let [Event::Dispatch {
        command,
        argument,
        sender,
    }] = &events[..]
    else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(sender, ADMIN);
    let follow_up = dispatcher.handle(command, argument);
    assert_eq!(
        follow_up,
        [Event::Feedback("Adjusting volume from 50% to 20% over 0 seconds".into())]
    );
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(output.volume(), 20);
}

#[test]
fn viewers_cannot_change_volume() {
    let mut bot = media_bot();
    let events = bot.say("ahri", "!volume 100");
    assert_eq!(
        events.last(),
        Some(&Event::Alert(
            "The command volume is protected but ahri is not the broadcaster".into()
        ))
    );
}
