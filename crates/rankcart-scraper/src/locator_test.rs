use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::*;

// ---------------------------------------------------------------------------
// ScanState: pure termination logic
// ---------------------------------------------------------------------------

fn no_match_cards(n: usize) -> Vec<Option<String>> {
    (0..n).map(|i| Some(format!("/item-{i}"))).collect()
}

#[test]
fn first_match_in_dom_order_wins() {
    let mut state = ScanState::new(Some(10), 500);
    let cards = vec![
        Some("/a-X123-first".to_owned()),
        Some("/b-X123-second".to_owned()),
    ];
    let verdict = state.assess(&cards, "X123", 1000);
    assert_eq!(
        verdict,
        Verdict::Match(MatchCandidate {
            link: "/a-X123-first".to_owned(),
            position: 1,
        })
    );
}

#[test]
fn match_wins_even_when_result_set_is_exhausted() {
    let mut state = ScanState::new(Some(2), 500);
    let cards = vec![Some("/a-other".to_owned()), Some("/b-X123".to_owned())];
    let verdict = state.assess(&cards, "X123", 1000);
    assert!(matches!(verdict, Verdict::Match(ref c) if c.position == 2));
}

#[test]
fn cards_without_anchors_still_occupy_positions() {
    let mut state = ScanState::new(None, 500);
    let cards = vec![None, Some("/b-X123".to_owned())];
    let verdict = state.assess(&cards, "X123", 1000);
    assert!(matches!(verdict, Verdict::Match(ref c) if c.position == 2));
}

#[test]
fn loaded_count_reaching_known_total_exhausts() {
    let mut state = ScanState::new(Some(3), 500);
    let verdict = state.assess(&no_match_cards(3), "X123", 1000);
    assert_eq!(verdict, Verdict::Exhausted { loaded: 3 });
}

#[test]
fn ceiling_applies_even_with_unknown_total() {
    let mut state = ScanState::new(None, 500);
    let verdict = state.assess(&no_match_cards(500), "X123", 100_000);
    assert_eq!(verdict, Verdict::CeilingReached { loaded: 500 });
}

#[test]
fn match_beyond_ceiling_is_never_returned() {
    let mut state = ScanState::new(Some(10), 3);
    let mut cards = no_match_cards(4);
    cards.push(Some("/e-X123".to_owned()));
    let verdict = state.assess(&cards, "X123", 1000);
    assert_eq!(verdict, Verdict::CeilingReached { loaded: 5 });
}

#[test]
fn height_stall_needs_two_consecutive_bottomed_polls() {
    let mut state = ScanState::new(None, 500);

    // Poll 1: height grew from 0, no stall.
    assert_eq!(state.assess(&no_match_cards(3), "X123", 400), Verdict::Continue);
    state.advance(500);
    // Poll 2: bottomed (500 >= 400) and no growth — first stall.
    assert_eq!(state.assess(&no_match_cards(3), "X123", 400), Verdict::Continue);
    state.advance(500);
    // Poll 3: second consecutive stall terminates.
    assert_eq!(
        state.assess(&no_match_cards(3), "X123", 400),
        Verdict::HeightStalled { loaded: 3 }
    );
}

#[test]
fn height_growth_resets_the_stall_counter() {
    let mut state = ScanState::new(None, 500);

    assert_eq!(state.assess(&no_match_cards(3), "X123", 400), Verdict::Continue);
    state.advance(500);
    // First stall.
    assert_eq!(state.assess(&no_match_cards(3), "X123", 400), Verdict::Continue);
    state.advance(500);
    // Height grows: counter resets instead of terminating.
    assert_eq!(state.assess(&no_match_cards(6), "X123", 900), Verdict::Continue);
    state.advance(500);
    assert_eq!(state.assess(&no_match_cards(6), "X123", 900), Verdict::Continue);
    state.advance(500);
    assert_eq!(
        state.assess(&no_match_cards(6), "X123", 900),
        Verdict::HeightStalled { loaded: 6 }
    );
}

// ---------------------------------------------------------------------------
// locate_product: the async loop over a scripted driver
// ---------------------------------------------------------------------------

struct Frame {
    /// `Err` simulates a transient in-page evaluation failure.
    cards: Result<Vec<Option<String>>, ()>,
    height: u64,
}

/// Driver that replays a fixed sequence of poll observations. The frame
/// index advances on each `card_links` call; `scroll_height` reads the
/// frame of the poll in progress. Past the last frame the script repeats
/// its final observation.
struct ScriptedDriver {
    frames: Vec<Frame>,
    polls: Mutex<usize>,
    scrolls: Mutex<u64>,
    closed: bool,
}

impl ScriptedDriver {
    fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            polls: Mutex::new(0),
            scrolls: Mutex::new(0),
            closed: false,
        }
    }

    fn frame(&self, poll: usize) -> &Frame {
        &self.frames[poll.min(self.frames.len() - 1)]
    }

    fn polls_made(&self) -> usize {
        *self.polls.lock().unwrap()
    }

    fn scrolls_made(&self) -> u64 {
        *self.scrolls.lock().unwrap()
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&self, _url: &str, _timeout: Duration) -> Result<(), ScraperError> {
        unreachable!("not used by locator tests")
    }

    async fn wait_for(&self, _selector: &str, _timeout: Duration) -> Result<(), ScraperError> {
        unreachable!("not used by locator tests")
    }

    async fn type_text(&self, _selector: &str, _text: &str) -> Result<(), ScraperError> {
        unreachable!("not used by locator tests")
    }

    async fn submit_search(&self, _timeout: Duration) -> Result<(), ScraperError> {
        unreachable!("not used by locator tests")
    }

    async fn click(&self, _selector: &str) -> Result<(), ScraperError> {
        unreachable!("not used by locator tests")
    }

    async fn card_links(&self, _selector: &str) -> Result<Vec<Option<String>>, ScraperError> {
        let mut polls = self.polls.lock().unwrap();
        let frame = self.frame(*polls);
        *polls += 1;
        frame.cards.clone().map_err(|()| ScraperError::Evaluate {
            reason: "simulated DOM read failure".to_owned(),
        })
    }

    async fn inner_text(&self, _selector: &str) -> Result<Option<String>, ScraperError> {
        unreachable!("not used by locator tests")
    }

    async fn scroll_height(&self) -> Result<u64, ScraperError> {
        let polls = *self.polls.lock().unwrap();
        Ok(self.frame(polls.saturating_sub(1)).height)
    }

    async fn scroll_by(&self, _px: u64) -> Result<(), ScraperError> {
        *self.scrolls.lock().unwrap() += 1;
        Ok(())
    }

    async fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&self) -> Result<(), ScraperError> {
        unreachable!("not used by locator tests")
    }
}

fn ok_frame(cards: Vec<Option<String>>, height: u64) -> Frame {
    Frame {
        cards: Ok(cards),
        height,
    }
}

#[tokio::test(start_paused = true)]
async fn full_first_poll_with_match_needs_exactly_one_poll() {
    let driver = ScriptedDriver::new(vec![ok_frame(
        vec![Some("/a-X999".to_owned()), Some("/b-X123".to_owned())],
        1000,
    )]);

    let found = locate_product(&driver, ".card", "X123", Some(2), &ScrollConfig::default())
        .await
        .expect("locate should succeed");

    let candidate = found.expect("target should be found");
    assert_eq!(candidate.position, 2);
    assert_eq!(candidate.link, "/b-X123");
    assert_eq!(driver.polls_made(), 1, "match must stop the scan immediately");
    assert_eq!(driver.scrolls_made(), 0, "no scrolling after a match");
}

#[tokio::test(start_paused = true)]
async fn known_total_without_match_polls_until_exhausted() {
    // 10 advertised results revealed 5 per poll: ⌈10/5⌉ = 2 polls.
    let driver = ScriptedDriver::new(vec![
        ok_frame(no_match_cards(5), 2000),
        ok_frame(no_match_cards(10), 4000),
    ]);

    let found = locate_product(&driver, ".card", "X123", Some(10), &ScrollConfig::default())
        .await
        .expect("locate should succeed");

    assert!(found.is_none());
    assert_eq!(driver.polls_made(), 2);
}

#[tokio::test(start_paused = true)]
async fn unknown_total_terminates_on_ceiling() {
    let driver = ScriptedDriver::new(vec![ok_frame(no_match_cards(500), 100_000)]);

    let found = locate_product(&driver, ".card", "X123", None, &ScrollConfig::default())
        .await
        .expect("locate should succeed");

    assert!(found.is_none());
    assert_eq!(driver.polls_made(), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_total_terminates_after_two_stalled_polls() {
    // Height frozen at 400 from the first poll; offset passes the bottom
    // after the first scroll, so polls 2 and 3 are the consecutive stalls.
    let driver = ScriptedDriver::new(vec![ok_frame(no_match_cards(3), 400)]);

    let found = locate_product(&driver, ".card", "X123", None, &ScrollConfig::default())
        .await
        .expect("locate should succeed");

    assert!(found.is_none());
    assert_eq!(driver.polls_made(), 3);
    assert_eq!(driver.scrolls_made(), 2);
}

#[tokio::test(start_paused = true)]
async fn transient_card_read_failure_is_swallowed() {
    let driver = ScriptedDriver::new(vec![
        Frame {
            cards: Err(()),
            height: 500,
        },
        ok_frame(vec![Some("/b-X123".to_owned())], 500),
    ]);

    let found = locate_product(&driver, ".card", "X123", Some(1), &ScrollConfig::default())
        .await
        .expect("a failed DOM read must not abort the scan");

    let candidate = found.expect("target should be found on the second poll");
    assert_eq!(candidate.position, 1);
    assert_eq!(driver.polls_made(), 2);
}

#[tokio::test(start_paused = true)]
async fn closed_page_surfaces_as_an_error() {
    let mut driver = ScriptedDriver::new(vec![ok_frame(no_match_cards(1), 400)]);
    driver.closed = true;

    let result = locate_product(&driver, ".card", "X123", None, &ScrollConfig::default()).await;

    assert!(matches!(result, Err(ScraperError::DriverClosed)));
    assert_eq!(driver.polls_made(), 0, "no DOM reads on a closed page");
}
