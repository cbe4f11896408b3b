// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end runs over the simulated accelerator and a localhost TCP link

use std::net::TcpStream;
use std::thread;

use fusion_engine::{FrameCadence, FusionCycleController, PipelineError, PipelineStage, WindowGeometry};
use fusion_hal::{AcceleratorChannel, CoherentCache, SimulatedFusionEngine, TransferDirection};
use fusion_transports::prelude::*;

const SIDE: usize = 8;
const FRAME: usize = SIDE * SIDE;

fn geometry() -> WindowGeometry {
    WindowGeometry::new(FRAME, 7, 4).unwrap()
}

fn bind() -> (TcpFrameServer, String) {
    let server = TcpFrameServer::bind(TransportConfig::new("127.0.0.1:0")).unwrap();
    let address = server.local_addr().unwrap().to_string();
    (server, address)
}

type SimController =
    FusionCycleController<AcceleratorChannel<SimulatedFusionEngine>, FrameConnection<TcpStream>>;

fn sim_controller(
    server: TcpFrameServer,
    engine: SimulatedFusionEngine,
) -> SimController {
    let channel = AcceleratorChannel::bring_up(engine, CoherentCache).unwrap();
    let conn = server.accept_one().unwrap();
    FusionCycleController::new(geometry(), channel, conn)
}

/// Host side: follow the cadence with constant frames and collect results
fn stream_constant_frames(address: String, value: u8, cycles: usize) -> Vec<Vec<u8>> {
    let mut conn = TcpFrameClient::connect(&address).unwrap();
    let mut cadence = FrameCadence::new(geometry());
    let frame = vec![value; FRAME];
    let mut results = Vec::new();

    for _ in 0..cycles {
        for _ in 0..cadence.frames_to_send() {
            conn.send_exact(&frame).unwrap();
        }
        let mut fused = vec![0u8; FRAME];
        conn.receive_exact(&mut fused).unwrap();
        results.push(fused);
        cadence.advance();
    }
    results
}

#[test]
fn test_fused_frames_follow_ring_refill() {
    let (server, address) = bind();
    let client = thread::spawn(move || stream_constant_frames(address, 100, 8));

    let engine = SimulatedFusionEngine::configure(0, FRAME, 4).unwrap();
    let mut controller = sim_controller(server, engine);
    for _ in 0..8 {
        controller.run_cycle().unwrap();
    }
    let results = client.join().unwrap();

    // Each result is the mean of the previous cycle's new frames. The ring is
    // zero until cycle 4 starts refilling one slot per step.
    let expected = [0u8, 0, 0, 0, 0, 25, 50, 75];
    assert_eq!(results.len(), expected.len());
    for (n, (fused, value)) in results.iter().zip(expected).enumerate() {
        assert!(
            fused.iter().all(|&px| px == value),
            "result {} expected {} got {:?}",
            n,
            value,
            &fused[..4]
        );
    }

    let (channel, conn) = controller.into_parts();
    let stats = channel.stats();
    assert_eq!(stats.frames_received, 8);
    assert_eq!(stats.frames_sent, 8 * 4 * 2);
    assert_eq!(conn.frames_received(), 12);
    assert_eq!(conn.frames_sent(), 8);
}

#[test]
fn test_device_error_stops_pipeline() {
    let (server, address) = bind();
    let client = thread::spawn(move || {
        let mut conn = TcpFrameClient::connect(&address).unwrap();
        let mut fused = vec![0u8; FRAME];
        // The pipeline dies before emitting anything
        conn.receive_exact(&mut fused).is_err()
    });

    let engine = SimulatedFusionEngine::configure(0, FRAME, 4).unwrap();
    let faults = engine.fault_injector();
    let mut controller = sim_controller(server, engine);
    faults.fail_next(TransferDirection::ToDevice);

    let err = controller.run().unwrap_err();
    assert!(matches!(err, PipelineError::Transfer { .. }));
    assert_eq!(err.stage(), PipelineStage::SendOld);
    assert_eq!(err.site().step, Some(0));
    assert_eq!(controller.cycles_completed(), 0);

    drop(controller);
    assert!(client.join().unwrap());
}

#[test]
fn test_peer_disconnect_stops_pipeline_at_refill() {
    let (server, address) = bind();
    let client = thread::spawn(move || {
        // Follow the warm-up, then vanish when frames are owed
        let mut conn = TcpFrameClient::connect(&address).unwrap();
        let mut cadence = FrameCadence::new(geometry());
        while cadence.frames_to_send() == 0 {
            let mut fused = vec![0u8; FRAME];
            conn.receive_exact(&mut fused).unwrap();
            cadence.advance();
        }
        cadence.cycle()
    });

    let engine = SimulatedFusionEngine::configure(0, FRAME, 4).unwrap();
    let mut controller = sim_controller(server, engine);
    let err = controller.run().unwrap_err();
    let vanished_at = client.join().unwrap();

    assert_eq!(vanished_at, 4);
    assert_eq!(err.stage(), PipelineStage::Refill);
    assert_eq!(err.site().cycle, 4);
    assert_eq!(err.site().step, Some(0));
    match err {
        PipelineError::Transport {
            source: TransportError::ConnectionClosed { received, expected },
            ..
        } => {
            assert_eq!(received, 0);
            assert_eq!(expected, FRAME);
        }
        other => panic!("expected connection closed, got {}", other),
    }
}
