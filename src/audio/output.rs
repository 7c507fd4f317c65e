//! Sound card output
//!
//! `CpalContext` is the device-backed `AudioContext`. `cpal::Stream` is not
//! `Send` on every platform, so a dedicated thread builds the stream, owns
//! it for its whole life and takes play/pause/close commands over a
//! channel. The stream callback renders the shared `Mixer`, whose frame
//! counter is the audio clock.

use crate::audio::context::{AudioContext, ContextState, Mixer, UnitId};
use crate::audio::voice::Voice;
use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

enum OutputCommand {
    Resume,
    Suspend,
    Close,
}

type Reply = Sender<Result<()>>;

pub struct CpalContext {
    mixer: Arc<Mutex<Mixer>>,
    sample_rate: f32,
    state: Mutex<ContextState>,
    command_tx: Sender<(OutputCommand, Reply)>,
    thread: Option<JoinHandle<()>>,
}

impl CpalContext {
    /// Open the default output device. The stream starts suspended.
    pub fn open() -> Result<Self> {
        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        let thread = thread::Builder::new()
            .name("chordmood-output".into())
            .spawn(move || run_output_thread(command_rx, ready_tx))?;

        let (mixer, sample_rate) = ready_rx
            .recv()
            .map_err(|_| anyhow!("Audio output thread exited during startup"))??;

        Ok(CpalContext {
            mixer,
            sample_rate,
            state: Mutex::new(ContextState::Suspended),
            command_tx,
            thread: Some(thread),
        })
    }

    /// Boxed constructor for `SharedContext`
    pub fn open_shared() -> Result<Arc<dyn AudioContext>> {
        Ok(Arc::new(Self::open()?))
    }

    fn send(&self, command: OutputCommand) -> Result<()> {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        self.command_tx
            .send((command, reply_tx))
            .map_err(|_| anyhow!("Audio output thread is not running"))?;
        reply_rx
            .recv()
            .map_err(|_| anyhow!("Audio output thread did not reply"))?
    }

    /// Pause the stream and freeze the clock
    pub fn suspend(&self) -> Result<()> {
        let mut state = self.state.lock();
        if *state == ContextState::Running {
            self.send(OutputCommand::Suspend)?;
            *state = ContextState::Suspended;
        }
        Ok(())
    }
}

impl AudioContext for CpalContext {
    fn current_time(&self) -> f64 {
        self.mixer.lock().time()
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn state(&self) -> ContextState {
        *self.state.lock()
    }

    fn resume(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            ContextState::Running => Ok(()),
            ContextState::Closed => Err(anyhow!("Cannot resume a closed audio context")),
            ContextState::Suspended => {
                self.send(OutputCommand::Resume)?;
                *state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn start_voice(&self, voice: Voice) -> UnitId {
        self.mixer.lock().add(voice)
    }

    fn stop_voice(&self, id: UnitId) {
        self.mixer.lock().remove(id);
    }

    fn active_voices(&self) -> usize {
        self.mixer.lock().len()
    }
}

impl Drop for CpalContext {
    fn drop(&mut self) {
        *self.state.lock() = ContextState::Closed;
        let (reply_tx, _reply_rx) = crossbeam_channel::bounded(1);
        let _ = self.command_tx.send((OutputCommand::Close, reply_tx));
        if let Some(thread) = self.thread.take() {
            if thread.thread().id() != thread::current().id() {
                let _ = thread.join();
            }
        }
    }
}

fn run_output_thread(
    command_rx: Receiver<(OutputCommand, Reply)>,
    ready_tx: Sender<Result<(Arc<Mutex<Mixer>>, f32)>>,
) {
    let (stream, mixer, sample_rate) = match open_stream() {
        Ok(opened) => opened,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };
    let _ = ready_tx.send(Ok((mixer, sample_rate)));

    while let Ok((command, reply)) = command_rx.recv() {
        match command {
            OutputCommand::Resume => {
                let _ = reply.send(
                    stream
                        .play()
                        .map_err(|e| anyhow!("Failed to play stream: {}", e)),
                );
            }
            OutputCommand::Suspend => {
                let _ = reply.send(
                    stream
                        .pause()
                        .map_err(|e| anyhow!("Failed to pause stream: {}", e)),
                );
            }
            OutputCommand::Close => {
                let _ = reply.send(Ok(()));
                break;
            }
        }
    }
    log::debug!("audio output thread stopped");
}

fn open_stream() -> Result<(Stream, Arc<Mutex<Mixer>>, f32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No output device available"))?;
    let config = device.default_output_config()?;

    let sample_format = config.sample_format();
    let config: StreamConfig = config.into();
    let sample_rate = config.sample_rate.0 as f32;

    let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate)));
    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer.clone())?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer.clone())?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer.clone())?,
        _ => return Err(anyhow!("Unsupported sample format: {:?}", sample_format)),
    };

    // Some hosts start streams on creation
    if let Err(e) = stream.pause() {
        log::debug!("output stream could not start paused: {}", e);
    }

    Ok((stream, mixer, sample_rate))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<Stream>
where
    T: Sample + SizedSample + Send + 'static + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    let err_fn = |err: cpal::StreamError| {
        log::warn!("an error occurred on the output audio stream: {}", err);
    };

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let mut mixer = mixer.lock();
                for frame in data.chunks_mut(channels) {
                    let value: T = cpal::Sample::from_sample(mixer.render_frame());
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| anyhow!("Failed to build output stream: {}", e))?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_default_device() {
        // No audio device on most CI machines
        match CpalContext::open() {
            Ok(context) => {
                assert_eq!(context.state(), ContextState::Suspended);
                assert!(context.sample_rate() > 0.0);
                assert_eq!(context.active_voices(), 0);
            }
            Err(e) => {
                println!("CpalContext::open failed - likely no audio device: {}", e);
            }
        }
    }
}
