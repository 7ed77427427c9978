//! End-to-end scenarios: raw match documents through to the leaderboard

use serde_json::json;

use crate::{
    aggregate, rate, sort_players, MatchRecord, MatchStatAggregator, PlayerAverages, PlayerInput,
    RankingFilter, RatingConfig, RatingEngine,
};

#[test]
fn test_center_with_one_big_game() {
    let records = [MatchRecord::new(20.0, 2.0, 3.0, 1.0, 4.0, 2.0)];
    let averages = aggregate(&records).unwrap();
    assert_eq!(
        averages,
        PlayerAverages {
            pts: 20.0,
            threes: 2.0,
            two_int: 3.0,
            two_ext: 1.0,
            lf: 4.0,
            fouls: 2.0,
            games_played: 1,
        }
    );
    assert_eq!(rate(&averages, Some("Pivot")), 95);
}

#[test]
fn test_wing_without_games_gets_floor() {
    let averages = aggregate(&[]).unwrap();
    assert_eq!(averages, PlayerAverages::zero());
    assert_eq!(rate(&averages, Some("Ailier")), 50);
}

#[test]
fn test_unrecognized_position_does_not_fail() {
    let averages = aggregate(&[MatchRecord::new(14.0, 1.0, 2.0, 1.0, 3.0, 2.0)]).unwrap();
    let rating = rate(&averages, Some("Entraineur"));
    assert!((50..=100).contains(&rating));
}

#[test]
fn test_no_position_is_always_floor() {
    for pts in [0.0, 8.0, 35.0] {
        let averages = PlayerAverages { pts, games_played: 9, ..PlayerAverages::zero() };
        assert_eq!(rate(&averages, None), 50);
    }
}

#[test]
fn test_documents_from_storage_layer() {
    let raw = r#"[
        {"points": 14, "threes": 2, "two_int": 1, "ft_made": 2, "fouls_committed": 3},
        {"points": 9, "threes": 1, "two_ext": 1, "fouls_committed": 1},
        {"points": 6, "two_int": 3}
    ]"#;
    let docs: Vec<serde_json::Value> = serde_json::from_str(raw).unwrap();
    let averages = MatchStatAggregator::new().aggregate_documents(&docs).unwrap();

    // 29 / 3 = 9.666..
    assert_eq!(averages.pts, 9.7);
    assert_eq!(averages.threes, 1.0);
    // 4 / 3 = 1.333..
    assert_eq!(averages.two_int, 1.3);
    assert_eq!(averages.two_ext, 0.3);
    assert_eq!(averages.lf, 0.7);
    assert_eq!(averages.fouls, 1.3);

    // Point guard: 97*0.30 + 39*0.10 + 65*0.40 + 28*0.10 + 87*0.10 + bonus 6
    assert_eq!(rate(&averages, Some("Meneur")), 77);
}

#[test]
fn test_roster_from_json() {
    let raw = json!([
        {
            "id": "j1",
            "name": "Inès",
            "position": "Meneur",
            "matches": [
                {"points": 12, "threes": 2, "ft_made": 2, "fouls_committed": 1},
                {"points": 8, "threes": 1, "two_ext": 1, "ft_made": 1, "fouls_committed": 2}
            ]
        },
        {
            "id": "j2",
            "name": "Tom",
            "position": "Pivot",
            "matches": [
                {"points": 10, "two_int": 5, "fouls_committed": 4},
                {"points": "n/a"}
            ]
        },
        { "id": "j3", "name": "Léa" }
    ]);
    let roster: Vec<PlayerInput> = serde_json::from_value(raw).unwrap();

    let engine = RatingEngine::new(RatingConfig::default()).unwrap();
    let outcome = engine.process_roster(&roster).unwrap();

    let ids: Vec<&str> = outcome.ranking.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["j1", "j2", "j3"]);
    assert_eq!(outcome.ranking[2].rating, 50);
    assert_eq!(outcome.ranking[1].averages.games_played, 1);

    let by_fouls = sort_players(&outcome.ranking, RankingFilter::Discipline);
    assert_eq!(by_fouls[0].id, "j3");
}

#[test]
fn test_safe_to_share_across_threads() {
    let engine = RatingEngine::new(RatingConfig::default()).unwrap();
    let averages = PlayerAverages {
        pts: 11.0,
        threes: 1.0,
        two_int: 2.0,
        lf: 1.5,
        fouls: 2.0,
        games_played: 4,
        ..PlayerAverages::zero()
    };
    let expected = engine.calculator().rate(&averages, Some("SG"));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| engine.calculator().rate(&averages, Some("SG"))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_overflowing_totals_saturate_rating() {
    let records = [
        MatchRecord::new(1e308, 0.0, 0.0, 0.0, 0.0, 0.0),
        MatchRecord::new(1e308, 0.0, 0.0, 0.0, 0.0, 0.0),
    ];
    let averages = aggregate(&records).unwrap();
    assert!(averages.pts.is_infinite());

    let modest = aggregate(&[MatchRecord::new(8.0, 0.0, 0.0, 0.0, 0.0, 0.0); 2]).unwrap();
    assert!(rate(&averages, Some("Pivot")) >= rate(&modest, Some("Pivot")));
}
