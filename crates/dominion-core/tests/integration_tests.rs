//! Integration tests for the Dominion game engine.
//!
//! These tests drive complete flows through the public API: setup, turns,
//! card effects with their decisions, attacks and the end of the game.

use dominion_core::*;
use pretty_assertions::assert_eq;

/// Seated and set up, default kingdom
fn game_for(names: &[&str], seed: u64) -> Game {
    Game::with_players(names, GameConfig::with_seed(seed)).expect("game should set up")
}

fn game_with_kingdom(names: &[&str], kingdom: &[CardKind], seed: u64) -> Game {
    let config = GameConfig {
        seed: Some(seed),
        kingdom: Some(kingdom.to_vec()),
    };
    Game::with_players(names, config).expect("game should set up")
}

/// Gain a card from the supply straight into a player's hand
fn give(game: &mut Game, player: usize, kind: CardKind) -> Card {
    game.gain(player, kind, GainDestination::Hand)
        .unwrap_or_else(|| panic!("{} pile should not be empty", kind))
}

fn count_kind(cards: &[Card], kind: CardKind) -> usize {
    cards.iter().filter(|c| c.kind == kind).count()
}

fn requested_choice(events: &[GameEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, GameEvent::ChoiceRequested { .. }))
}

// ==================== Setup ====================

#[test]
fn test_supply_sizes_by_player_count() {
    let names = ["Alice", "Bob", "Carl", "Denise"];
    for count in 2..=4 {
        let game = game_for(&names[..count], 1);
        let supply = game.supply();
        let victory = if count == 2 { 8 } else { 12 };

        assert_eq!(supply.pile_size(CardKind::Estate), victory);
        assert_eq!(supply.pile_size(CardKind::Duchy), victory);
        assert_eq!(supply.pile_size(CardKind::Province), victory);
        assert_eq!(supply.pile_size(CardKind::Curse), 10 * (count - 1));
        assert_eq!(supply.pile_size(CardKind::Copper), 60 - 7 * count);
        for kind in CardKind::DEFAULT_KINGDOM {
            assert_eq!(supply.pile_size(kind), 10);
        }
    }
}

#[test]
fn test_starting_zones() {
    let game = game_for(&["Alice", "Bob"], 2);

    for player in game.players() {
        assert_eq!(player.hand.len(), 5);
        assert_eq!(player.deck.len(), 5);
        assert_eq!(player.owned_card_count(), 10);
    }
    assert_eq!(game.phase(), GamePhase::Ready);
    assert!(game.pending_choice().is_none());
}

#[test]
fn test_start_needs_two_players() {
    let mut game = Game::with_seed(1);
    assert_eq!(game.start(), Err(GameError::NotEnoughPlayers(0)));

    game.add_player("Alice").unwrap();
    assert_eq!(game.start(), Err(GameError::NotEnoughPlayers(1)));
}

// ==================== Turns ====================

#[test]
fn test_turn_event_order() {
    let mut game = game_for(&["Alice", "Bob"], 3);
    let events = game.play_turn().unwrap();

    // The starting hand holds no actions, so the action phase is silent
    assert_eq!(
        &events[..3],
        &[
            GameEvent::TurnStarted { player: 0, turn: 1 },
            GameEvent::PhaseChanged {
                player: 0,
                phase: GamePhase::Action,
            },
            GameEvent::PhaseChanged {
                player: 0,
                phase: GamePhase::Buy,
            },
        ]
    );
    assert!(requested_choice(&events));
    assert_eq!(game.phase(), GamePhase::Buy);
}

#[test]
fn test_buy_silver() {
    let mut game = game_for(&["Alice", "Bob"], 4);
    give(&mut game, 0, CardKind::Silver);

    game.play_turn().unwrap();
    let silver = game
        .pending_choice()
        .and_then(|c| c.position_of_pile(CardKind::Silver))
        .expect("Silver should be affordable");

    let events = game.decide_option(&[silver]).unwrap();
    assert!(events.contains(&GameEvent::CardGained {
        player: 0,
        card: CardKind::Silver,
        to: GainDestination::Discard,
    }));
    assert!(events.contains(&GameEvent::TurnEnded { player: 0 }));
    assert_eq!(game.supply().pile_size(CardKind::Silver), 38);
    assert_eq!(game.phase(), GamePhase::Ready);
}

#[test]
fn test_buy_cellar() {
    let mut game = game_for(&["Alice", "Bob"], 5);

    game.play_turn().unwrap();
    let cellar = game
        .pending_choice()
        .and_then(|c| c.position_of_pile(CardKind::Cellar))
        .expect("Cellar costs 2");
    game.decide_option(&[cellar]).unwrap();

    let player = game.player(0).unwrap();
    assert_eq!(count_kind(&player.discard, CardKind::Cellar), 1);
    assert_eq!(game.supply().pile_size(CardKind::Cellar), 9);
}

#[test]
fn test_invalid_index_leaves_choice_pending() {
    let mut game = game_for(&["Alice", "Bob"], 6);
    game.play_turn().unwrap();
    let options = game.pending_choice().unwrap().options.len();

    let err = game.decide_option(&[options]).unwrap_err();
    assert!(matches!(err, GameError::InvalidIndex { index, .. } if index == options));
    assert!(err.to_string().contains(" 0 : "));
    assert!(game.pending_choice().is_some());

    let events = game.decide_option(&[]).unwrap();
    assert!(events.contains(&GameEvent::TurnEnded { player: 0 }));
    assert!(game.pending_choice().is_none());
}

#[test]
fn test_merchant_bonus_pays_per_silver() {
    let mut game = game_for(&["Alice", "Bob"], 7);
    give(&mut game, 0, CardKind::Merchant);
    give(&mut game, 0, CardKind::Silver);

    game.play_turn().unwrap();
    let merchant = game.pending_choice().unwrap().options[0];
    assert_eq!(merchant.as_card().map(|c| c.kind), Some(CardKind::Merchant));
    game.decide_option(&[0]).unwrap();

    assert_eq!(game.phase(), GamePhase::Buy);
    let player = game.player(0).unwrap();
    let silvers = player.count_in_hand(CardKind::Silver) as u32;
    assert_eq!(player.coins, player.coin_value_of_hand() + silvers);
    assert!(player.merchant_bonus.is_empty());
}

#[test]
fn test_play_card_must_be_in_hand() {
    let mut game = game_for(&["Alice", "Bob"], 8);
    let card = game.player(1).unwrap().hand[0];

    assert_eq!(game.play_card(0, card.id), Err(GameError::CardNotInHand(card.id)));
    assert_eq!(game.play_card(5, card.id), Err(GameError::UnknownPlayer(5)));
}

// ==================== Card Effects ====================

#[test]
fn test_cellar_redraws_discarded_cards() {
    let mut game = game_for(&["Alice", "Bob"], 9);
    let cellar = give(&mut game, 0, CardKind::Cellar);
    assert_eq!(game.player(0).unwrap().hand.len(), 6);
    assert_eq!(game.player(0).unwrap().deck.len(), 5);

    game.play_card(0, cellar.id).unwrap();
    let pending = game.pending_choice().unwrap();
    assert_eq!((pending.min_choices, pending.max_choices), (0, None));

    game.decide_option(&[0, 1, 2, 3, 4]).unwrap();

    let player = game.player(0).unwrap();
    assert_eq!(player.hand.len(), 5);
    assert_eq!(player.deck.len(), 0);
    assert_eq!(player.discard.len(), 5);
    assert_eq!(player.actions, 1);
}

#[test]
fn test_cellar_with_empty_hand_needs_no_decision() {
    let mut game = game_for(&["Alice", "Bob"], 10);
    {
        let player = game.player_mut(0).unwrap();
        let mut hand = std::mem::take(&mut player.hand);
        player.discard.append(&mut hand);
    }
    let cellar = give(&mut game, 0, CardKind::Cellar);

    let events = game.play_card(0, cellar.id).unwrap();
    assert!(!requested_choice(&events));
    assert!(game.pending_choice().is_none());
    assert!(game.player(0).unwrap().hand.is_empty());
}

#[test]
fn test_drawing_reshuffles_discard() {
    let mut game = game_for(&["Alice", "Bob"], 11);
    let discarded = {
        let player = game.player_mut(0).unwrap();
        let mut hand = std::mem::take(&mut player.hand);
        player.discard.append(&mut hand);
        player.deck.truncate(1);
        player.discard.len()
    };
    let card = give(&mut game, 0, CardKind::Smithy);

    let events = game.play_card(0, card.id).unwrap();
    assert!(events.contains(&GameEvent::Reshuffled { player: 0 }));

    let player = game.player(0).unwrap();
    assert_eq!(player.shuffles, 1);
    assert_eq!(player.hand.len(), 3);
    assert!(player.discard.is_empty());
    assert_eq!(player.deck.len(), discarded - 2);
}

// ==================== Attacks ====================

#[test]
fn test_witch_curses_unprotected_target() {
    let mut game = game_with_kingdom(&["Alice", "Bob"], &[CardKind::Witch, CardKind::Moat], 12);
    let witch = give(&mut game, 0, CardKind::Witch);

    let events = game.play_card(0, witch.id).unwrap();
    assert!(!requested_choice(&events));

    let target = game.player(1).unwrap();
    assert_eq!(target.discard.len(), 1);
    assert_eq!(count_kind(&target.discard, CardKind::Curse), 1);
    assert_eq!(game.supply().pile_size(CardKind::Curse), 9);
    assert_eq!(game.count_points()[&target.name], 2);
}

#[test]
fn test_moat_blocks_witch() {
    let mut game = game_with_kingdom(&["Alice", "Bob"], &[CardKind::Witch, CardKind::Moat], 13);
    let moat = give(&mut game, 1, CardKind::Moat);
    let witch = give(&mut game, 0, CardKind::Witch);
    let before = game.player(1).unwrap().clone();

    game.play_card(0, witch.id).unwrap();
    let pending = game.pending_choice().unwrap();
    assert_eq!(pending.player, 1);
    assert_eq!((pending.min_choices, pending.max_choices), (0, Some(1)));
    let index = pending.position_of_card(moat.id).unwrap();

    let events = game.decide_option(&[index]).unwrap();
    assert!(events.contains(&GameEvent::AttackBlocked {
        attacker: 0,
        target: 1,
        reaction: CardKind::Moat,
    }));

    let after = game.player(1).unwrap();
    assert_eq!(after.hand, before.hand);
    assert_eq!(after.deck, before.deck);
    assert_eq!(after.discard, before.discard);
    assert_eq!(game.supply().pile_size(CardKind::Curse), 10);
}

#[test]
fn test_declined_moat_takes_the_curse() {
    let mut game = game_with_kingdom(&["Alice", "Bob"], &[CardKind::Witch, CardKind::Moat], 14);
    give(&mut game, 1, CardKind::Moat);
    let witch = give(&mut game, 0, CardKind::Witch);

    game.play_card(0, witch.id).unwrap();
    game.decide_option(&[]).unwrap();

    assert_eq!(count_kind(&game.player(1).unwrap().discard, CardKind::Curse), 1);
    assert_eq!(game.supply().pile_size(CardKind::Curse), 9);
}

#[test]
fn test_militia_discards_down_to_three() {
    let mut game = game_for(&["Alice", "Bob"], 15);
    let militia = give(&mut game, 0, CardKind::Militia);

    game.play_card(0, militia.id).unwrap();
    assert_eq!(game.player(0).unwrap().coins, 2);

    let pending = game.pending_choice().unwrap();
    assert_eq!(pending.player, 1);
    assert_eq!((pending.min_choices, pending.max_choices), (2, Some(2)));
    assert!(matches!(
        game.decide_option(&[0]),
        Err(GameError::TooFewChoices { chosen: 1, min: 2 })
    ));

    game.decide_option(&[0, 1]).unwrap();
    let target = game.player(1).unwrap();
    assert_eq!(target.hand.len(), 3);
    assert_eq!(target.discard.len(), 2);
}

#[test]
fn test_bureaucrat_against_moats() {
    let names = ["Alice", "Bob", "Carl", "Denise"];
    let mut game = game_with_kingdom(&names, &[CardKind::Bureaucrat, CardKind::Moat], 16);
    give(&mut game, 1, CardKind::Moat);
    give(&mut game, 2, CardKind::Moat);
    let bureaucrat = give(&mut game, 0, CardKind::Bureaucrat);
    let victories: Vec<usize> = game
        .players()
        .iter()
        .map(|p| p.hand.iter().filter(|c| c.is_victory()).count())
        .collect();
    let hands: Vec<usize> = game.players().iter().map(|p| p.hand.len()).collect();

    game.play_card(0, bureaucrat.id).unwrap();
    let attacker = game.player(0).unwrap();
    assert!(attacker.played.contains(&bureaucrat));
    assert_eq!(attacker.deck.last().map(|c| c.kind), Some(CardKind::Silver));

    // Bob reveals Moat
    assert_eq!(game.pending_choice().unwrap().player, 1);
    game.decide_option(&[0]).unwrap();

    // Carl keeps Moat hidden and is attacked
    assert_eq!(game.pending_choice().unwrap().player, 2);
    game.decide_option(&[]).unwrap();

    // Any remaining decision is a Victory card to put back
    while let Some(choice) = game.pending_choice() {
        assert!(choice.options.iter().all(|o| o.as_card().is_some_and(|c| c.is_victory())));
        game.decide_option(&[0]).unwrap();
    }

    assert_eq!(game.player(1).unwrap().hand.len(), hands[1]);
    for target in [2, 3] {
        let player = game.player(target).unwrap();
        let put_back = victories[target].min(1);
        assert_eq!(player.hand.len(), hands[target] - put_back);
        if put_back == 1 {
            assert!(player.deck.last().is_some_and(|c| c.is_victory()));
        }
    }
}

#[test]
fn test_spy_reveals_attacker_first() {
    let mut game = game_with_kingdom(&["Alice", "Bob"], &[CardKind::Spy], 17);
    let spy = give(&mut game, 0, CardKind::Spy);
    let total = game.total_cards();

    game.play_card(0, spy.id).unwrap();
    let first = game.pending_choice().unwrap();
    assert_eq!(first.player, 0);
    assert_eq!(game.total_cards(), total);
    let deck = game.player(0).unwrap().deck.len();

    let put_back = first.position_of_answer(Answer::PutBack).unwrap();
    game.decide_option(&[put_back]).unwrap();
    assert_eq!(game.player(0).unwrap().deck.len(), deck + 1);

    // Bob has no reaction; the attacker decides for him too
    let second = game.pending_choice().unwrap();
    assert_eq!(second.player, 0);
    let discard = second.position_of_answer(Answer::Discard).unwrap();
    game.decide_option(&[discard]).unwrap();

    assert!(game.pending_choice().is_none());
    assert_eq!(game.player(1).unwrap().discard.len(), 1);
    assert_eq!(game.total_cards(), total);
}

#[test]
fn test_thief_takes_a_treasure() {
    let mut game = game_with_kingdom(&["Alice", "Bob"], &[CardKind::Thief], 18);
    let gold = game.gain(1, CardKind::Gold, GainDestination::Deck).unwrap();
    let thief = give(&mut game, 0, CardKind::Thief);
    let total = game.total_cards();

    game.play_card(0, thief.id).unwrap();
    let choice = game.pending_choice().unwrap();
    if let Some(index) = choice.position_of_card(gold.id) {
        game.decide_option(&[index]).unwrap();
    }

    let choice = game.pending_choice().unwrap();
    assert_eq!(choice.player, 0);
    let yes = choice.position_of_answer(Answer::Yes).unwrap();
    game.decide_option(&[yes]).unwrap();

    assert!(game.player(0).unwrap().discard.contains(&gold));
    assert!(game.trash().is_empty());
    assert_eq!(game.total_cards(), total);
}

// ==================== Scoring ====================

#[test]
fn test_fresh_game_scores_three_each() {
    let game = game_for(&["Alice", "Bob"], 19);
    let points = game.count_points();

    assert_eq!(points["Alice"], 3);
    assert_eq!(points["Bob"], 3);
}

#[test]
fn test_gardens_counts_owned_cards() {
    let mut game = game_with_kingdom(&["Alice", "Bob"], &[CardKind::Gardens], 20);
    let name = game.player(0).unwrap().name.clone();
    {
        // Eight cards owned: drop three Coppers
        let player = game.player_mut(0).unwrap();
        let mut deck = std::mem::take(&mut player.deck);
        player.hand.append(&mut deck);
        let mut dropped = 0;
        player.hand.retain(|c| {
            if c.kind == CardKind::Copper && dropped < 3 {
                dropped += 1;
                return false;
            }
            true
        });
        assert_eq!(player.owned_card_count(), 7);
    }

    give(&mut game, 0, CardKind::Gardens);
    assert_eq!(game.player(0).unwrap().owned_card_count(), 8);
    assert_eq!(game.count_points()[&name], 3);

    give(&mut game, 0, CardKind::Copper);
    give(&mut game, 0, CardKind::Copper);
    assert_eq!(game.count_points()[&name], 4);
}

// ==================== Game End ====================

#[test]
fn test_empty_province_pile_ends_game_mid_round() {
    let mut game = game_for(&["Alice", "Bob", "Carl"], 21);
    for _ in 0..11 {
        game.gain(0, CardKind::Province, GainDestination::Discard).unwrap();
    }
    for _ in 0..3 {
        give(&mut game, 0, CardKind::Gold);
    }

    game.start().unwrap();
    let province = game
        .pending_choice()
        .and_then(|c| c.position_of_pile(CardKind::Province))
        .expect("Province should be affordable");
    let events = game.decide_option(&[province]).unwrap();

    assert!(game.is_finished());
    assert_eq!(game.turn(), 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::GameFinished { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::TurnStarted { player: 1, .. })));
    assert_eq!(game.winners(), vec![game.player(0).unwrap().name.clone()]);
    assert_eq!(game.play_turn(), Err(GameError::GameOver));
}

#[test]
fn test_three_empty_piles_end_game() {
    let mut game = game_for(&["Alice", "Bob"], 22);
    for kind in [CardKind::Cellar, CardKind::Moat, CardKind::Village] {
        while game.gain(1, kind, GainDestination::Discard).is_some() {}
    }
    assert_eq!(game.empty_piles().len(), 3);

    game.play_turn().unwrap();
    game.decide_option(&[]).unwrap();

    assert!(game.is_finished());
    assert_eq!(game.phase(), GamePhase::Finished);
}

#[test]
fn test_random_games_conserve_cards() {
    let attacks = [
        CardKind::Witch,
        CardKind::Militia,
        CardKind::Bureaucrat,
        CardKind::Bandit,
        CardKind::Spy,
        CardKind::Thief,
        CardKind::Moat,
        CardKind::ThroneRoom,
        CardKind::Library,
        CardKind::Sentry,
    ];
    let engines = [
        CardKind::Vassal,
        CardKind::Harbinger,
        CardKind::Chapel,
        CardKind::Feast,
        CardKind::Artisan,
        CardKind::Adventurer,
        CardKind::Chancellor,
        CardKind::Poacher,
        CardKind::CouncilRoom,
        CardKind::Moneylender,
    ];
    let names = ["Alice", "Bob", "Carl", "Denise"];

    for seed in 0..6u64 {
        let players = 2 + (seed as usize % 3);
        let kingdom: &[CardKind] = match seed % 3 {
            0 => &CardKind::DEFAULT_KINGDOM,
            1 => &attacks,
            _ => &engines,
        };
        let mut game = game_with_kingdom(&names[..players], kingdom, seed);
        let mut driver = RandomDriver::with_seed(seed);
        let total = game.total_cards();

        game.start().unwrap();
        let mut decisions = 0;
        while driver.resolve_pending(&mut game).unwrap().is_some() {
            assert_eq!(game.total_cards(), total, "seed {} after {} decisions", seed, decisions);
            decisions += 1;
            assert!(decisions < 100_000, "seed {} did not finish", seed);
        }

        assert!(game.is_finished(), "seed {} stopped without finishing", seed);
        assert_eq!(game.total_cards(), total);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Finished);
        assert!(snapshot.to_json().is_ok());
    }
}

// ==================== Nested Plays ====================

/// Pick the option holding `card` in the pending choice
fn decide_card(game: &mut Game, card: &Card) -> Vec<GameEvent> {
    let index = game
        .pending_choice()
        .and_then(|c| c.position_of_card(card.id))
        .unwrap_or_else(|| panic!("{} should be on offer", card.kind));
    game.decide_option(&[index]).unwrap()
}

#[test]
fn test_throne_room_cellar_asks_twice_before_buying() {
    let kingdom = [CardKind::ThroneRoom, CardKind::Cellar];
    let mut game = game_with_kingdom(&["Alice", "Bob"], &kingdom, 23);
    let throne = give(&mut game, 0, CardKind::ThroneRoom);
    let cellar = give(&mut game, 0, CardKind::Cellar);
    let total = game.total_cards();

    game.play_turn().unwrap();
    decide_card(&mut game, &throne);
    decide_card(&mut game, &cellar);

    // First Cellar: discard two and draw two
    let first = game.pending_choice().unwrap();
    assert_eq!(first.player, 0);
    assert_eq!(first.options.len(), 5);
    assert_eq!((first.min_choices, first.max_choices), (0, None));
    game.decide_option(&[0, 1]).unwrap();
    assert_eq!(game.phase(), GamePhase::Action);
    assert_eq!(game.player(0).unwrap().deck.len(), 3);
    assert_eq!(game.total_cards(), total);

    // Second Cellar finishes before the action phase moves on
    let second = game.pending_choice().unwrap();
    assert_eq!(second.options.len(), 5);
    assert_eq!((second.min_choices, second.max_choices), (0, None));
    let events = game.decide_option(&[]).unwrap();
    assert!(events.contains(&GameEvent::PhaseChanged {
        player: 0,
        phase: GamePhase::Buy,
    }));

    assert_eq!(game.phase(), GamePhase::Buy);
    let player = game.player(0).unwrap();
    assert_eq!(player.played, vec![throne, cellar]);
    assert_eq!(player.hand.len(), 5);
    assert_eq!(player.discard.len(), 2);
    assert_eq!(game.total_cards(), total);
}

#[test]
fn test_throne_room_militia_attacks_twice() {
    let kingdom = [CardKind::ThroneRoom, CardKind::Militia];
    let mut game = game_with_kingdom(&["Alice", "Bob"], &kingdom, 24);
    let throne = give(&mut game, 0, CardKind::ThroneRoom);
    let militia = give(&mut game, 0, CardKind::Militia);

    game.play_turn().unwrap();
    decide_card(&mut game, &throne);
    let events = decide_card(&mut game, &militia);
    assert_eq!(game.player(0).unwrap().coins, 2);

    // First attack: Bob discards two; the second finds three cards and asks nothing
    let pending = game.pending_choice().unwrap();
    assert_eq!(pending.player, 1);
    assert_eq!((pending.min_choices, pending.max_choices), (2, Some(2)));
    let after = game.decide_option(&[0, 1]).unwrap();

    let plays = events
        .iter()
        .chain(after.iter())
        .filter(|e| matches!(e, GameEvent::CardPlayed { card: CardKind::Militia, .. }))
        .count();
    assert_eq!(plays, 2);
    assert_eq!(game.player(1).unwrap().hand.len(), 3);

    // Back in the buy phase with both Militia payouts
    assert_eq!(game.phase(), GamePhase::Buy);
    let pending = game.pending_choice().unwrap();
    assert_eq!(pending.player, 0);
    let player = game.player(0).unwrap();
    assert_eq!(player.coins, 4 + player.coin_value_of_hand());
}
