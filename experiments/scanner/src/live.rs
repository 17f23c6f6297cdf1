use {
    minifb::{Key, KeyRepeat, Window, WindowOptions},
    session::Session,
};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

fn print_view(session: &Session) {
    println!("{}", session.view());
}

async fn switch_to_next(session: &mut Session) {
    let Some(next) = session.registry().next_id().map(str::to_string) else {
        return;
    };
    if let Err(e) = session.select_device(&next).await {
        log::warn!("cannot switch to {}: {}", next, e);
    }
}

async fn handle_key(session: &mut Session, key: Key) {
    match key {
        Key::Space => {
            if session.capture().await.is_none() {
                println!("Kamera belum siap.");
            }
        }
        Key::Tab => switch_to_next(session).await,
        Key::R => {
            if session.retry().is_none() {
                println!("Tidak ada gambar untuk dikirim ulang.");
            }
        }
        _ => return,
    }
    print_view(session);
}

/// Mirrored preview window driving the session from the keyboard.
pub async fn run(
    mut session: Session,
    device: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    session.start().await;
    if let Some(id) = device {
        session.select_device(&id).await?;
    }
    let mut results = session.subscribe();
    print_view(&session);

    let mut window = Window::new(
        "Jerawat - Space: ambil gambar, Tab: ganti kamera, R: coba lagi, Esc: keluar",
        WIDTH,
        HEIGHT,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    let mut shown = None;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        for key in window.get_keys_pressed(KeyRepeat::No) {
            handle_key(&mut session, key).await;
        }

        if results.has_changed().unwrap_or(false) {
            results.mark_unchanged();
            print_view(&session);
        }

        let frame = session
            .feed()
            .and_then(|feed| feed.latest())
            .filter(|frame| shown != Some(frame.index));
        let Some(frame) = frame else {
            window.update();
            continue;
        };
        match image::image_to_u32(&frame.image, session.options().mirrored()) {
            Ok((size, buffer)) => {
                window.update_with_buffer(&buffer, size.x, size.y)?;
                shown = Some(frame.index);
            }
            Err(e) => {
                log::warn!("cannot show frame {}: {}", frame.index, e);
                window.update();
            }
        }
    }

    session.shutdown().await;
    Ok(())
}
