//! Integration Tests für den Board Poller
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen die Mocks aus board-tests

use board_core::{
    BoardPoller, ColorName, ConfigError, HttpError, LED_COUNT, LedError, PollOutcome,
    PollerConfig, ProtocolError, StripWriter,
};
use board_tests::{
    MockFrameTimer, MockHttpClient, MockStripWriter, Reply, board_json, brightness_json,
};
use embassy_futures::block_on;
use rgb::RGB8;

const BOARD_PATH: &str = "/api/show/getCurrentBoard";
const BRIGHTNESS_PATH: &str = "/api/show/getBrightness";
const BUFFER_SIZE: usize = 4096;

const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

fn config() -> PollerConfig<'static> {
    PollerConfig::new(
        "ESP32-Light-Server",
        "adminLukas",
        "http://192.168.4.2:8001/api/show/getCurrentBoard",
        "http://192.168.4.2:8001/api/show/getBrightness",
    )
}

fn poller() -> BoardPoller<'static, MockStripWriter> {
    BoardPoller::new(&config(), MockStripWriter::new()).unwrap()
}

/// Führt `count` Durchläufe aus und gibt die Reports zurück
fn run_cycles(
    poller: &mut BoardPoller<'static, MockStripWriter>,
    client: &mut MockHttpClient,
    timer: &mut MockFrameTimer,
    count: usize,
) -> Vec<board_core::CycleReport> {
    let mut buf = [0u8; BUFFER_SIZE];
    (0..count)
        .map(|_| block_on(poller.run_cycle(client, timer, &mut buf)))
        .collect()
}

// ============================================================================
// Tests: MockStripWriter
// ============================================================================

#[test]
fn test_mock_strip_writer_write() {
    let mut mock = MockStripWriter::new();
    let pixels = [RGB8 { r: 10, g: 0, b: 0 }; 3];

    assert_eq!(mock.write_count, 0);
    assert_eq!(mock.last_pixels, None);

    mock.write(&pixels, 128).unwrap();

    assert_eq!(mock.write_count, 1);
    assert_eq!(mock.last_pixels.as_deref(), Some(&pixels[..]));
    assert_eq!(mock.last_brightness, Some(128));
}

#[test]
fn test_mock_strip_writer_recovers_after_fail() {
    let mut mock = MockStripWriter::new();
    mock.fail_next_write = true;

    assert_eq!(mock.write(&[BLACK], 1), Err(LedError::WriteFailed));
    assert_eq!(mock.write_count, 0);

    assert!(mock.write(&[BLACK], 1).is_ok());
    assert_eq!(mock.write_count, 1);
}

// ============================================================================
// Tests: Start
// ============================================================================

#[test]
fn test_new_rejects_invalid_config() {
    let result = BoardPoller::new(&config().with_frame_rate(0), MockStripWriter::new());
    assert!(matches!(result, Err(ConfigError::ZeroFrameRate)));
}

#[test]
fn test_start_turns_strip_off_at_full_brightness() {
    let mut poller = poller();
    poller.start().unwrap();

    let writer = poller.writer();
    assert_eq!(writer.write_count, 1);
    assert_eq!(writer.last_brightness, Some(255));
    let pixels = writer.last_pixels.as_ref().unwrap();
    assert_eq!(pixels.len(), LED_COUNT);
    assert!(pixels.iter().all(|p| *p == BLACK));
}

// ============================================================================
// Tests: Poll-and-render
// ============================================================================

#[test]
fn test_successful_poll_renders_flushes_and_waits() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    let names: Vec<&str> = ColorName::ALL
        .iter()
        .map(|c| c.as_str())
        .cycle()
        .take(LED_COUNT)
        .collect();
    client.push(BOARD_PATH, Reply::json(200, &board_json(&names)));

    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);

    assert_eq!(reports[0].board, PollOutcome::Applied);
    assert_eq!(reports[0].brightness, None);
    assert_eq!(reports[0].frame_delay_ms, Some(20));
    assert_eq!(timer.waits, vec![20]);

    let writer = poller.writer();
    assert_eq!(writer.write_count, 1);
    let pixels = writer.last_pixels.as_ref().unwrap();
    for (index, pixel) in pixels.iter().enumerate() {
        assert_eq!(*pixel, ColorName::ALL[index % ColorName::ALL.len()].rgb());
    }
}

#[test]
fn test_unknown_color_leaves_pixel_cleared() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(
        BOARD_PATH,
        Reply::json(200, &board_json(&["WHITE", "MAGENTA", "white", "", "COLOR4"])),
    );
    run_cycles(&mut poller, &mut client, &mut timer, 1);

    let pixels = poller.frame().pixels();
    assert_eq!(pixels[0], ColorName::White.rgb());
    assert_eq!(pixels[1], BLACK);
    assert_eq!(pixels[2], BLACK);
    assert_eq!(pixels[3], BLACK);
    assert_eq!(pixels[4], ColorName::Color4.rgb());
}

#[test]
fn test_non_string_color_clears_only_that_pixel() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(
        BOARD_PATH,
        Reply::json(
            200,
            r#"{"boardInfo":{"board":[{"color":5},{"color":"WHITE"},{"color":false},{"color":"COLOR2"}]}}"#,
        ),
    );
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);

    assert_eq!(reports[0].board, PollOutcome::Applied);
    let pixels = poller.frame().pixels();
    assert_eq!(pixels[0], BLACK);
    assert_eq!(pixels[1], ColorName::White.rgb());
    assert_eq!(pixels[2], BLACK);
    assert_eq!(pixels[3], ColorName::Color2.rgb());
    assert_eq!(poller.writer().write_count, 1);
}

#[test]
fn test_large_and_decimal_brightness_saturate() {
    let mut poller = BoardPoller::new(
        &config().with_brightness_refresh_frames(0),
        MockStripWriter::new(),
    )
    .unwrap();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(
        BRIGHTNESS_PATH,
        Reply::json(200, r#"{"brightness":99999999999999999999}"#),
    );
    client.push(BRIGHTNESS_PATH, Reply::json(200, r#"{"brightness":128.0}"#));

    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);
    assert_eq!(reports[0].brightness, Some(PollOutcome::Applied));
    assert_eq!(poller.frame().brightness(), 255);

    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);
    assert_eq!(reports[0].brightness, Some(PollOutcome::Applied));
    assert_eq!(poller.frame().brightness(), 128);
    assert_eq!(poller.writer().last_brightness, Some(128));
}

#[test]
fn test_short_board_does_not_write_out_of_bounds() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    // Erst voller Frame, dann kurze Liste: Rest muss dunkel werden
    client.push(BOARD_PATH, Reply::json(200, &board_json(&["GREEN"; LED_COUNT])));
    client.push(BOARD_PATH, Reply::json(200, &board_json(&["COLOR1", "COLOR2"])));
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 2);

    assert_eq!(reports[1].board, PollOutcome::Applied);
    let pixels = poller.frame().pixels();
    assert_eq!(pixels[0], ColorName::Color1.rgb());
    assert_eq!(pixels[1], ColorName::Color2.rgb());
    assert!(pixels[2..].iter().all(|p| *p == BLACK));
}

#[test]
fn test_long_board_is_truncated_to_strip() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    let mut names = vec!["COLOR5"; LED_COUNT];
    names.extend(["WHITE"; 10]);
    client.push(BOARD_PATH, Reply::json(200, &board_json(&names)));
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);

    assert_eq!(reports[0].board, PollOutcome::Applied);
    assert!(
        poller
            .frame()
            .pixels()
            .iter()
            .all(|p| *p == ColorName::Color5.rgb())
    );
}

#[test]
fn test_chunked_board_response() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(
        BOARD_PATH,
        Reply::chunked(200, &board_json(&["COLOR3"; LED_COUNT]), 64),
    );
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);

    assert_eq!(reports[0].board, PollOutcome::Applied);
    assert_eq!(poller.frame().pixels()[LED_COUNT - 1], ColorName::Color3.rgb());
}

#[test]
fn test_non_200_keeps_previous_frame() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(BOARD_PATH, Reply::json(200, &board_json(&["COLOR6"; LED_COUNT])));
    client.push(BOARD_PATH, Reply::json(500, "{}"));
    client.push(BOARD_PATH, Reply::json(404, &board_json(&["WHITE"; LED_COUNT])));
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 3);

    assert_eq!(reports[1].board, PollOutcome::Rejected(500));
    assert_eq!(reports[2].board, PollOutcome::Rejected(404));
    assert_eq!(reports[1].frame_delay_ms, None);
    assert_eq!(reports[2].frame_delay_ms, None);

    // Nur der erste Durchlauf hat geflusht und gewartet
    assert_eq!(poller.writer().write_count, 1);
    assert_eq!(timer.waits, vec![20]);
    assert!(
        poller
            .frame()
            .pixels()
            .iter()
            .all(|p| *p == ColorName::Color6.rgb())
    );
}

#[test]
fn test_transport_error_is_ignored() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(BOARD_PATH, Reply::Error(HttpError::Timeout));
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 2);

    assert_eq!(reports[0].board, PollOutcome::Transport(HttpError::Timeout));
    // Queue leer, kein Default: Server nicht erreichbar
    assert_eq!(reports[1].board, PollOutcome::Transport(HttpError::Connect));
    assert_eq!(poller.writer().write_count, 0);
    assert!(timer.waits.is_empty());
}

#[test]
fn test_malformed_json_keeps_frame_and_skips_delay() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(BOARD_PATH, Reply::json(200, &board_json(&["WHITE"; 5])));
    client.push(BOARD_PATH, Reply::json(200, "{\"boardInfo\":"));
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 2);

    assert_eq!(
        reports[1].board,
        PollOutcome::Malformed(ProtocolError::InvalidJson)
    );
    assert_eq!(reports[1].frame_delay_ms, None);
    assert_eq!(poller.writer().write_count, 1);
    assert_eq!(poller.frame().pixels()[0], ColorName::White.rgb());
}

#[test]
fn test_truncated_response_is_transport_error() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(
        BOARD_PATH,
        Reply::Raw(b"HTTP/1.1 200 OK\r\nContent-Length: 500\r\n\r\n{\"boardInfo\"".to_vec()),
    );
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);

    assert_eq!(reports[0].board, PollOutcome::Transport(HttpError::Truncated));
}

#[test]
fn test_write_failure_still_throttles() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.set_default(BOARD_PATH, Reply::json(200, &board_json(&["GREEN"; 3])));
    poller.writer_mut().fail_next_write = true;
    let reports = run_cycles(&mut poller, &mut client, &mut timer, 2);

    assert_eq!(
        reports[0].board,
        PollOutcome::WriteFailed(LedError::WriteFailed)
    );
    assert_eq!(reports[1].board, PollOutcome::Applied);
    assert_eq!(timer.waits, vec![20, 20]);
    assert_eq!(poller.writer().write_count, 1);
}

#[test]
fn test_frame_delay_follows_frame_rate() {
    let mut poller =
        BoardPoller::new(&config().with_frame_rate(30), MockStripWriter::new()).unwrap();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.set_default(BOARD_PATH, Reply::json(200, &board_json(&["WHITE"])));
    run_cycles(&mut poller, &mut client, &mut timer, 3);

    assert_eq!(timer.waits, vec![33, 33, 33]);
}

// ============================================================================
// Tests: Brightness refresh
// ============================================================================

#[test]
fn test_exactly_one_refresh_in_201_cycles() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.set_default(BOARD_PATH, Reply::json(200, &board_json(&["WHITE"; 4])));
    client.set_default(BRIGHTNESS_PATH, Reply::json(200, &brightness_json(100)));

    let reports = run_cycles(&mut poller, &mut client, &mut timer, 200);
    assert!(reports.iter().all(|r| r.brightness.is_none()));
    assert_eq!(client.count(BRIGHTNESS_PATH), 0);
    assert_eq!(poller.schedule().counter(), 200);

    let reports = run_cycles(&mut poller, &mut client, &mut timer, 1);
    assert_eq!(reports[0].brightness, Some(PollOutcome::Applied));
    assert_eq!(client.count(BRIGHTNESS_PATH), 1);
    assert_eq!(poller.schedule().counter(), 0);
    assert_eq!(poller.frame().brightness(), 100);
}

#[test]
fn test_refresh_period_over_many_cycles() {
    let mut poller = poller();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    // Auch ohne erreichbaren Board-Endpunkt läuft der Zähler weiter
    client.set_default(BRIGHTNESS_PATH, Reply::json(200, &brightness_json(42)));

    let reports = run_cycles(&mut poller, &mut client, &mut timer, 201 * 3);
    let refreshes: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.brightness.is_some())
        .map(|(index, _)| index + 1)
        .collect();

    assert_eq!(refreshes, vec![201, 402, 603]);
    assert!(poller.schedule().counter() <= 200);
}

#[test]
fn test_request_order_around_refresh() {
    let mut poller = BoardPoller::new(
        &config().with_brightness_refresh_frames(1),
        MockStripWriter::new(),
    )
    .unwrap();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.set_default(BOARD_PATH, Reply::json(200, &board_json(&["WHITE"])));
    client.set_default(BRIGHTNESS_PATH, Reply::json(200, &brightness_json(10)));
    run_cycles(&mut poller, &mut client, &mut timer, 3);

    // Nach dem Refresh geht es wieder mit dem Board-Endpunkt weiter
    assert_eq!(
        client.requests,
        vec![BOARD_PATH, BOARD_PATH, BRIGHTNESS_PATH, BOARD_PATH]
    );
}

#[test]
fn test_brightness_is_clamped_and_flushed() {
    let mut poller = BoardPoller::new(
        &config().with_brightness_refresh_frames(0),
        MockStripWriter::new(),
    )
    .unwrap();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(BRIGHTNESS_PATH, Reply::json(200, &brightness_json(300)));
    client.push(BRIGHTNESS_PATH, Reply::json(200, &brightness_json(-7)));

    run_cycles(&mut poller, &mut client, &mut timer, 1);
    assert_eq!(poller.frame().brightness(), 255);
    assert_eq!(poller.writer().last_brightness, Some(255));

    run_cycles(&mut poller, &mut client, &mut timer, 1);
    assert_eq!(poller.frame().brightness(), 0);
    assert_eq!(poller.writer().last_brightness, Some(0));
    assert_eq!(poller.writer().write_count, 2);
}

#[test]
fn test_brightness_failures_keep_level() {
    let mut poller = BoardPoller::new(
        &config().with_brightness_refresh_frames(0),
        MockStripWriter::new(),
    )
    .unwrap();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(BRIGHTNESS_PATH, Reply::json(200, &brightness_json(80)));
    client.push(BRIGHTNESS_PATH, Reply::json(503, &brightness_json(5)));
    client.push(BRIGHTNESS_PATH, Reply::json(200, "{\"level\":5}"));
    client.push(BRIGHTNESS_PATH, Reply::Error(HttpError::Io));

    let reports = run_cycles(&mut poller, &mut client, &mut timer, 4);

    assert_eq!(reports[0].brightness, Some(PollOutcome::Applied));
    assert_eq!(reports[1].brightness, Some(PollOutcome::Rejected(503)));
    assert_eq!(
        reports[2].brightness,
        Some(PollOutcome::Malformed(ProtocolError::InvalidJson))
    );
    assert_eq!(
        reports[3].brightness,
        Some(PollOutcome::Transport(HttpError::Io))
    );
    assert_eq!(poller.frame().brightness(), 80);
    assert_eq!(poller.writer().write_count, 1);
}

#[test]
fn test_brightness_change_keeps_pixels() {
    let mut poller = BoardPoller::new(
        &config().with_brightness_refresh_frames(0),
        MockStripWriter::new(),
    )
    .unwrap();
    let mut client = MockHttpClient::new();
    let mut timer = MockFrameTimer::new();

    client.push(BOARD_PATH, Reply::json(200, &board_json(&["COLOR2"; LED_COUNT])));
    client.push(BRIGHTNESS_PATH, Reply::json(200, &brightness_json(64)));
    run_cycles(&mut poller, &mut client, &mut timer, 1);

    let writer = poller.writer();
    assert_eq!(writer.write_count, 2);
    assert_eq!(writer.last_brightness, Some(64));
    assert!(
        writer
            .last_pixels
            .as_ref()
            .unwrap()
            .iter()
            .all(|p| *p == ColorName::Color2.rgb())
    );
}
