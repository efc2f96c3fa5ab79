// Unit tests for gh-user-search
// These tests work with the public API without touching the network

#[cfg(test)]
mod config_tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use gh_user_search::app::keymap::{KeyAction, Keymap};
    use gh_user_search::app::theme::Theme;
    use gh_user_search::config::Settings;

    fn temp_path(tag: &str) -> String {
        let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("ghus_{tag}_{}_{}.conf", std::process::id(), nonce));
        path.to_string_lossy().to_string()
    }

    #[test]
    fn settings_roundtrip_never_stores_token() {
        let p = temp_path("settings");
        let s = Settings {
            api_base: "https://ghe.example.com/api/v3".into(),
            token: Some("secret".into()),
            repo_page_size: 25,
            stagger: Duration::from_millis(40),
            animations: false,
            log_file: Some("/tmp/ghus.log".into()),
            ..Settings::default()
        };
        s.write_file(&p).expect("write settings");
        let contents = std::fs::read_to_string(&p).expect("read back");
        assert!(!contents.contains("secret"));

        let back = Settings::from_file(&p).expect("parse settings");
        assert_eq!(back.token, None);
        assert_eq!(back, Settings { token: None, ..s });
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn settings_load_or_init_creates_missing_file() {
        let p = temp_path("settings_init");
        let _ = std::fs::remove_file(&p);
        let s = Settings::load_or_init(&p);
        assert!(std::path::Path::new(&p).exists());
        assert_eq!(s.user_page_size, 5);
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn theme_write_includes_header_and_all_keys_once() {
        let p = temp_path("theme");
        Theme::amber().write_file(&p).expect("write theme file");
        let contents = std::fs::read_to_string(&p).expect("read back theme file");
        assert!(contents.starts_with("# gh-user-search theme"));

        for k in ["text = ", "accent = ", "badge_fg = ", "badge_bg = ", "error = ", "highlight_bg = "] {
            assert_eq!(contents.matches(k).count(), 1, "key '{}' should appear exactly once", k);
        }
        let back = Theme::from_file(&p).expect("read theme");
        assert_eq!(back, Theme::amber());
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn keymap_file_roundtrip_keeps_bindings() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let p = temp_path("keys");
        let km = Keymap::parse("LoadMoreRepos = l\n");
        km.write_file(&p).expect("write keymap");
        let back = Keymap::from_file(&p).expect("read keymap");

        let l = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(back.resolve(&l), Some(KeyAction::LoadMoreRepos));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(back.resolve(&ctrl_c), Some(KeyAction::Quit));
        assert_eq!(back.keys_for(KeyAction::ToggleHelp), vec!["?".to_string()]);
        let _ = std::fs::remove_file(&p);
    }
}

#[cfg(test)]
mod paging_tests {
    use gh_user_search::FetchError;
    use gh_user_search::fetch::{LoadOutcome, PagedLoader};
    use gh_user_search::paging::{PageCursor, merge};

    #[test]
    fn exactly_full_last_page_costs_one_empty_fetch() {
        let mut loader = PagedLoader::<u32>::new(5);
        let t = loader.begin("q", 1);
        loader.finish(&t, Ok((0..5).collect()));
        assert!(loader.cursor().has_next_page);

        let t = loader.load_more().expect("page 2");
        assert_eq!(t.page, 2);
        let out = loader.finish(&t, Ok(Vec::new()));
        assert_eq!(
            out,
            LoadOutcome::Applied { items: (0..5).collect(), cursor: PageCursor { page: 2, has_next_page: false } }
        );
        assert!(loader.load_more().is_none());
    }

    #[test]
    fn failure_leaves_items_and_cursor() {
        let mut loader = PagedLoader::<u32>::new(2);
        let t = loader.begin("q", 1);
        loader.finish(&t, Ok(vec![1, 2]));
        let t = loader.load_more().expect("page 2");
        let out = loader.finish(&t, Err(FetchError::Network("down".into())));
        assert!(matches!(out, LoadOutcome::Failed(FetchError::Network(_))));
        assert_eq!(loader.items(), &[1, 2]);
        assert_eq!(loader.cursor(), PageCursor { page: 1, has_next_page: true });
        assert!(!loader.is_loading());
    }

    #[test]
    fn merge_appends_without_dedup() {
        assert_eq!(merge(&[1, 2], vec![2, 3], 2), vec![1, 2, 2, 3]);
        assert_eq!(merge(&[1, 2], vec![9], 1), vec![9]);
    }
}

#[cfg(test)]
mod transition_tests {
    use std::time::{Duration, Instant};

    use gh_user_search::transition::{
        TransitionConfig, TransitionPhase, TransitionRequest, TransitionSequencer, cubic_bezier,
        standard_ease,
    };

    #[test]
    fn easing_is_pinned_at_the_ends_and_monotone() {
        assert!(standard_ease(0.0).abs() < 1e-4);
        assert!((standard_ease(1.0) - 1.0).abs() < 1e-4);
        let mut last = 0.0;
        for i in 1..=20 {
            let v = cubic_bezier(0.4, 0.0, 0.2, 1.0, i as f32 / 20.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn queued_requests_run_in_order() {
        let mut seq = TransitionSequencer::new(0u16, TransitionConfig::default());
        seq.request(TransitionRequest::Reveal(3));
        seq.request(TransitionRequest::Collapse(0));
        seq.request(TransitionRequest::Reveal(7));
        assert_eq!(seq.queued(), 3);

        let mut now = Instant::now();
        let mut seen = Vec::new();
        for _ in 0..40 {
            seq.advance(now, |c| *c);
            if seen.last() != Some(seq.content()) {
                seen.push(*seq.content());
            }
            now += Duration::from_millis(100);
        }
        assert_eq!(seen, vec![0, 3, 0, 7]);
        assert_eq!(seq.phase(), TransitionPhase::Idle);
        assert_eq!(seq.height_override(), None);
    }
}
