//! Runs a scripted opening on the simulated bench: homing, a human e2e4
//! played by the simulated hand, and the engine's e7e5 reply executed by the
//! carriage. `RUST_LOG=info cargo run --bin sim` shows the controller's view.

use std::cell::RefCell;
use std::rc::Rc;

use chessboard_common::{
    Color, Config, ControlResult, Controller, MoveRecord, OccupancyGrid, OracleVerdict, Square,
};
use chessboard_tester::{BoardPhysics, ScriptedOracle, SimHal};
use log::info;

fn main() -> ControlResult<()> {
    env_logger::init();

    let cfg = Config::default();
    let physics = Rc::new(RefCell::new(BoardPhysics::new(
        OccupancyGrid::standard_start(),
        &cfg,
    )));
    let mut hal = SimHal::new(physics.clone(), &cfg);

    let reply: MoveRecord = "e7e5".parse()?;
    let oracle = ScriptedOracle::new([OracleVerdict::Accepted { reply: Some(reply) }]);
    let mut controller = Controller::new(&cfg, OccupancyGrid::standard_start(), oracle);

    let status = controller.poll(&mut hal)?;
    info!("homing: {status:?}");

    // The simulated hand plays e2e4, holding the pawn across two sweeps.
    controller.poll(&mut hal)?;
    physics.borrow_mut().lift("e2".parse()?);
    controller.poll(&mut hal)?;
    controller.poll(&mut hal)?;
    physics.borrow_mut().place("e4".parse()?);
    let status = controller.poll(&mut hal)?;
    info!("after white's move: {status:?}");

    let (wm, ws) = controller.clock().remaining(Color::White);
    let (bm, bs) = controller.clock().remaining(Color::Black);
    println!("clocks  white {wm}:{ws:02}  black {bm}:{bs:02}");

    let board = physics.borrow();
    for name in ["e2", "e4", "e7", "e5"] {
        let sq: Square = name.parse()?;
        println!("{name} occupied: {}", board.occupancy().get(sq));
    }
    Ok(())
}
