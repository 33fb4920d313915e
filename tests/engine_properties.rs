use approx::assert_abs_diff_eq;
use bounce_simulation::{
    decode_trajectory, encode_trajectory, BounceParameters, BounceSimulator, GravityTable,
    RESTITUTION, STOP_TIME,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const TOLERANCE: f64 = 1e-6;

// Random drops across the whole catalog, reproducible through the fixed seed.
fn random_drops(count: usize) -> Vec<(String, f64, f64)> {
    let table = GravityTable::standard();
    let planets = table.list_planets();
    let mut rng = StdRng::seed_from_u64(0xB0_0CE);

    (0..count)
        .map(|_| {
            let planet = &planets[rng.gen_range(0..planets.len())];
            let height = rng.gen_range(0.001..200.0);
            (planet.name.clone(), height, planet.gravity)
        })
        .collect()
}

#[test]
fn test_trajectory_invariants_hold_for_random_drops() {
    let simulator = BounceSimulator::default();

    for (planet, height, gravity) in random_drops(200) {
        let result = simulator
            .simulate(height, gravity)
            .unwrap_or_else(|e| panic!("{} from {} m failed: {}", planet, height, e));
        let samples = result.trajectory.samples();

        let first = samples[0];
        assert_eq!((first.time, first.height, first.velocity), (0.0, height, 0.0));
        assert!(samples.len() >= 2);
        assert!(
            samples.iter().all(|sample| sample.height >= -TOLERANCE),
            "{} from {} m went below ground",
            planet,
            height
        );
        assert!(samples.windows(2).all(|pair| pair[1].time > pair[0].time));
        assert!(result.trajectory.last().time <= STOP_TIME + TOLERANCE);
        assert!(result.trajectory.max_height() <= height + TOLERANCE);
    }
}

#[test]
fn test_every_contact_reverses_velocity_with_restitution() {
    let simulator = BounceSimulator::default();

    for (_, height, gravity) in random_drops(100) {
        let result = simulator.simulate(height, gravity).unwrap();

        for (index, contact) in result.contacts.iter().enumerate() {
            assert!(contact.impact_velocity < 0.0);
            let expected = if result.rest_time == Some(contact.time) {
                assert_eq!(index, result.contacts.len() - 1);
                0.0
            } else {
                RESTITUTION * contact.impact_velocity.abs()
            };
            assert_abs_diff_eq!(contact.rebound_velocity, expected, epsilon = 1e-12);

            let sample = result
                .trajectory
                .samples()
                .iter()
                .find(|sample| sample.time == contact.time)
                .expect("every contact is sampled exactly");
            assert_eq!(sample.height, 0.0);
        }
        assert!(result.contacts.windows(2).all(|pair| pair[1].time > pair[0].time));
    }
}

#[test]
fn test_identical_inputs_give_identical_output() {
    let simulator = BounceSimulator::default();

    for (_, height, gravity) in random_drops(20) {
        let first = simulator.simulate(height, gravity).unwrap();
        let second = simulator.simulate(height, gravity).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            encode_trajectory(&first.trajectory).unwrap(),
            encode_trajectory(&second.trajectory).unwrap()
        );
    }
}

#[test]
fn test_csv_round_trip_reproduces_samples() {
    let simulator = BounceSimulator::default();

    for (_, height, gravity) in random_drops(25) {
        let trajectory = simulator.simulate(height, gravity).unwrap().trajectory;
        let decoded = decode_trajectory(&encode_trajectory(&trajectory).unwrap()).unwrap();

        assert_eq!(decoded.samples(), trajectory.samples());
    }
}

#[test]
fn test_first_contact_follows_free_fall_time() {
    let table = GravityTable::standard();
    let simulator = BounceSimulator::default();

    let earth = simulator
        .simulate(3.0, table.lookup("Earth").unwrap())
        .unwrap();
    let moon = simulator
        .simulate(3.0, table.lookup("Moon").unwrap())
        .unwrap();

    let earth_contact = earth.first_contact().unwrap().time;
    let moon_contact = moon.first_contact().unwrap().time;
    assert_abs_diff_eq!(earth_contact, 0.78, epsilon = 0.005);
    assert_abs_diff_eq!(moon_contact, 1.93, epsilon = 0.005);
    assert!(moon_contact > earth_contact);
}

#[test]
fn test_lower_restitution_settles_sooner() {
    let bouncy = BounceSimulator::new(BounceParameters {
        restitution: 0.9,
        ..BounceParameters::default()
    })
    .unwrap();
    let dull = BounceSimulator::new(BounceParameters {
        restitution: 0.5,
        ..BounceParameters::default()
    })
    .unwrap();

    let bouncy = bouncy.simulate(1.0, 9.81).unwrap();
    let dull = dull.simulate(1.0, 9.81).unwrap();

    let dull_rest = dull.rest_time.expect("0.5 restitution settles quickly");
    match bouncy.rest_time {
        Some(rest) => assert!(rest > dull_rest),
        None => assert!(bouncy.contacts.len() > dull.contacts.len()),
    }
}
