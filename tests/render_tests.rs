mod helpers;

use combat::EnemyKind;
use dungeon::{GridPosition, ObstacleKind};
use helpers::*;
use hero::ScriptedDice;
use tiny_dungeon_rpg::{
    input::Buttons,
    render::{self, Glyph},
};

#[test]
fn field_view_centres_on_player() {
    let mut game = TestGameBuilder::new()
        .obstacle("0-6", GridPosition::new(9, 21, 0), ObstacleKind::Chest, 0)
        .build();
    start_new_game(&mut game);

    let mut screen = RecordingScreen::default();
    render::draw(&game, &mut screen);
    let [DrawCall::Field(view)] = screen.calls.as_slice() else {
        panic!("expected a lone field draw, got {:?}", screen.calls);
    };
    assert_eq!(view.rows.len(), 7);
    assert_eq!(view.rows[3][3], Glyph::Player);
    assert_eq!(view.rows[3][4], Glyph::Chest);
    assert_eq!(view.status, "B1F HP 30 MP 6    0G");

    // looted chests disappear from the view
    press(&mut game, Buttons::held(dungeon::Direction::Right));
    let view = render::field_view(&game);
    assert_eq!(view.rows[3][4], Glyph::Floor);
}

#[test]
fn menu_shows_status_and_selector() {
    let mut game = TestGameBuilder::new().build();
    start_new_game(&mut game);
    press(&mut game, Buttons::cancel());

    let mut screen = RecordingScreen::default();
    render::draw(&game, &mut screen);
    let panels: Vec<&[String]> = screen.panels().collect();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0][0], "HP  30/ 30");
    assert_eq!(panels[1], ["You are on B1F", " Save Spells Reset"]);
    assert!(screen.calls.contains(&DrawCall::Selector {
        columns: vec![1, 6, 13],
        row: 15,
        selected: 0,
    }));
}

#[test]
fn battle_draws_portrait_and_command_prompt() {
    let mut game = TestGameBuilder::new()
        .dice(ScriptedDice::new().floats([1.0, 1.0]))
        .build();
    start_new_game(&mut game);
    game.start_battle(EnemyKind::Pumpkin, None);

    let mut screen = RecordingScreen::default();
    render::draw(&game, &mut screen);
    assert!(matches!(
        screen.calls.first(),
        Some(DrawCall::Portrait { name, .. }) if name == "Pumpkin"
    ));
    let message = screen
        .calls
        .iter()
        .find_map(|c| match c {
            DrawCall::Panel { y1: 8, lines, .. } => Some(lines.clone()),
            _ => None,
        })
        .expect("battle message panel");
    assert_eq!(
        message,
        vec!["Pumpkin appears!", "What will you do?", " Attack Spell Run"]
    );
}
