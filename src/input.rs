use bevy::prelude::*;

use chunkstream::{PlaceBlockRequest, StreamingObserver};

/// Reach of the stand-in placement pick, in blocks.
const PLACE_DISTANCE: f32 = 3.0;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (move_observer, request_block_placement, exit_system));
    }
}

#[derive(Component)]
pub struct ObserverMotion {
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Default for ObserverMotion {
    fn default() -> Self {
        Self {
            move_speed: 12.0,
            turn_speed: 1.8,
        }
    }
}

fn move_observer(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut observer_query: Query<(&mut Transform, &ObserverMotion), With<StreamingObserver>>,
) {
    let Ok((mut transform, motion)) = observer_query.get_single_mut() else {
        return;
    };
    let dt = time.delta_seconds();

    let mut turn = 0.0;
    if keyboard.pressed(KeyCode::KeyQ) {
        turn += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        turn -= 1.0;
    }
    transform.rotate_y(turn * motion.turn_speed * dt);

    let forward = transform.forward().as_vec3().with_y(0.0).normalize_or_zero();
    let right = transform.right().as_vec3().with_y(0.0).normalize_or_zero();

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction -= right;
    }

    transform.translation += direction.normalize_or_zero() * motion.move_speed * dt;
}

/// Right click puts a block on the ground a few blocks ahead. A real game
/// would raycast; this only has to produce a hit cell and a face normal.
fn request_block_placement(
    mouse_button: Res<ButtonInput<MouseButton>>,
    observer_query: Query<&Transform, With<StreamingObserver>>,
    mut requests: EventWriter<PlaceBlockRequest>,
) {
    if !mouse_button.just_pressed(MouseButton::Right) {
        return;
    }
    let Ok(transform) = observer_query.get_single() else {
        return;
    };

    let ahead = transform.translation
        + transform.forward().as_vec3().with_y(0.0).normalize_or_zero() * PLACE_DISTANCE;
    requests.send(PlaceBlockRequest {
        hit: IVec3::new(ahead.x.floor() as i32, 0, ahead.z.floor() as i32),
        normal: Vec3::Y,
    });
}

fn exit_system(keyboard: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
}
