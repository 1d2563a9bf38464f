/// How a transport should begin playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayRequest {
    /// Continue from the remembered paused position.
    Resume,
    /// Start from the top of the track.
    Reset,
    /// Start at an explicit position in seconds.
    At(f64),
}

/// The audio side of the song clock.
///
/// Implemented by the audio manager; the clock only reads positions and
/// forwards play/stop so it can stay in charge of song time.
pub trait MusicTransport {
    /// Begin playback. Returns false when nothing could be started
    /// (no buffer, no device); the clock keeps running on wall-clock time.
    fn play(&mut self, request: PlayRequest) -> bool;

    /// Halt playback. With `reset` the remembered position snaps to 0.
    fn stop(&mut self, reset: bool);

    /// Raw playback position in seconds, or `None` when no audio exists.
    fn music_time(&self) -> Option<f64>;
}

impl<M: MusicTransport + ?Sized> MusicTransport for &mut M {
    fn play(&mut self, request: PlayRequest) -> bool {
        (**self).play(request)
    }

    fn stop(&mut self, reset: bool) {
        (**self).stop(reset)
    }

    fn music_time(&self) -> Option<f64> {
        (**self).music_time()
    }
}

/// Transport for sessions without audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl MusicTransport for Silent {
    fn play(&mut self, _request: PlayRequest) -> bool {
        false
    }

    fn stop(&mut self, _reset: bool) {}

    fn music_time(&self) -> Option<f64> {
        None
    }
}
