use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["goodwave"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn spots_defaults_to_one_unfiltered_page() {
    let cli = Cli::try_parse_from(["goodwave", "spots"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Spots {
            pages: 1,
            spot_type: None,
            search: None,
            saved: false
        })
    ));
}

#[test]
fn spots_with_all_filters() {
    let cli = Cli::try_parse_from([
        "goodwave", "spots", "--pages", "3", "--type", "reef", "--search", "bali", "--saved",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Spots {
            pages,
            spot_type,
            search,
            saved,
        }) => {
            assert_eq!(pages, 3);
            assert_eq!(spot_type.as_deref(), Some("reef"));
            assert_eq!(search.as_deref(), Some("bali"));
            assert!(saved);
        }
        other => panic!("expected Spots, got {other:?}"),
    }
}

#[test]
fn spot_requires_an_id() {
    assert!(Cli::try_parse_from(["goodwave", "spot"]).is_err());
    let cli = Cli::try_parse_from(["goodwave", "spot", "42"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Spot { id }) if id == "42"));
}

#[test]
fn save_and_unsave_take_an_id() {
    let cli = Cli::try_parse_from(["goodwave", "save", "7"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Save { id }) if id == "7"));

    let cli = Cli::try_parse_from(["goodwave", "unsave", "7"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Unsave { id }) if id == "7"));
}

#[test]
fn favorites_takes_no_arguments() {
    let cli = Cli::try_parse_from(["goodwave", "favorites"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Favorites)));
    assert!(Cli::try_parse_from(["goodwave", "favorites", "extra"]).is_err());
}

#[test]
fn map_accepts_page_count() {
    let cli = Cli::try_parse_from(["goodwave", "map", "--pages", "2"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Map { pages: 2 })));
}

#[test]
fn pages_must_be_numeric() {
    assert!(Cli::try_parse_from(["goodwave", "spots", "--pages", "many"]).is_err());
}
