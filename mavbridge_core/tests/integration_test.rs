//! MAVBridge 集成测试
//!
//! 测试各个模块之间的集成功能。

// 配置系统集成测试
#[cfg(test)]
mod config_tests {
    use mavbridge_config::BridgeConfig;

    #[test]
    fn test_config_from_toml() {
        let config = BridgeConfig::from_toml_str(
            r#"
            log_unhandled = true

            [ekf_status]
            namespace = "uav1"
            queue_size = 4
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.ekf_status.channel(), "uav1/ekf_status");
        assert_eq!(config.ekf_status.queue_size, 4);
        assert!(config.log_unhandled);
    }

    #[test]
    fn test_config_summary() {
        let summary = BridgeConfig::default().summary();
        assert!(summary.contains("ekf_status/ekf_status"));
    }
}

// 应用与插件集成测试
#[cfg(test)]
mod bridge_tests {
    use mavbridge_config::BridgeConfig;
    use mavbridge_core::{App, BridgeError, Bus};
    use mavbridge_plugins::EkfStatusPlugin;
    use mavbridge_protocol::{
        Attitude, DecodedMessage, EkfStatusReport, FixedClock, Heartbeat, MessageHeader,
        MessageKind, OutgoingMessage, Stamp,
    };
    use std::sync::Arc;
    use tokio::sync::mpsc;

    const TOPIC: &str = "ekf_status/ekf_status";

    fn report(value: f32) -> EkfStatusReport {
        EkfStatusReport {
            velocity_variance: value,
            pos_horiz_variance: value,
            pos_vert_variance: value,
            compass_variance: value,
            terrain_alt_variance: value,
            airspeed_variance: value,
        }
    }

    fn initialized_app(clock: Stamp) -> App {
        let mut app = App::new()
            .set_clock(Arc::new(FixedClock(clock)))
            .add_plugin(EkfStatusPlugin::new())
            .unwrap();
        app.initialize().unwrap();
        app
    }

    #[test]
    fn test_ekf_report_reaches_subscriber() {
        let app = initialized_app(Stamp::new(1_700_000_000, 250));
        let mut rx = app.bus().unwrap().subscribe(TOPIC).unwrap();

        let msg = DecodedMessage::new(MessageHeader::new(1, 1, 3), report(0.5));
        assert_eq!(app.dispatch(&msg).unwrap(), 1);

        let OutgoingMessage::EkfStatus(status) = rx.try_recv().unwrap();
        assert_eq!(status.compass_variance, 0.5);
        assert_eq!(
            status.header.unwrap().stamp(),
            Stamp::new(1_700_000_000, 250)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unhandled_kinds_publish_nothing() {
        let app = initialized_app(Stamp::default());
        let mut rx = app.bus().unwrap().subscribe(TOPIC).unwrap();
        let header = MessageHeader::default();

        assert_eq!(
            app.dispatch(&DecodedMessage::new(header, Heartbeat::default()))
                .unwrap(),
            0
        );
        assert_eq!(
            app.dispatch(&DecodedMessage::new(header, Attitude::default()))
                .unwrap(),
            0
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dispatch_before_initialize_is_rejected() {
        let app = App::new().add_plugin(EkfStatusPlugin::new()).unwrap();
        let msg = DecodedMessage::new(MessageHeader::default(), report(0.1));

        let err = app.dispatch(&msg).unwrap_err();
        assert!(err.is_lifecycle_violation());
        assert!(matches!(err, BridgeError::NotInitialized(_)));
    }

    #[test]
    fn test_shared_bus_and_custom_topic() {
        let bus = Arc::new(Bus::default());
        let mut config = BridgeConfig::default();
        config.ekf_status.namespace = String::new();
        config.ekf_status.topic = "ekf".to_string();

        let mut app = App::new()
            .set_config(config)
            .set_bus(Arc::clone(&bus))
            .add_plugin(EkfStatusPlugin::new())
            .unwrap();
        let mut rx = bus.subscribe("ekf").unwrap();
        app.initialize().unwrap();

        app.dispatch(&DecodedMessage::new(MessageHeader::default(), report(0.3)))
            .unwrap();
        assert!(rx.try_recv().is_ok());
        assert_eq!(app.subscribed_kinds(), vec![MessageKind::EkfStatusReport]);
    }

    #[test]
    fn test_duplicate_plugin_rejected() {
        let result = App::new()
            .add_plugin(EkfStatusPlugin::new())
            .unwrap()
            .add_plugin(EkfStatusPlugin::new());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_preserves_order() {
        let app = initialized_app(Stamp::new(10, 0));
        let mut rx = app.bus().unwrap().subscribe(TOPIC).unwrap();

        let (tx, transport) = mpsc::channel(8);
        for value in [0.1, 0.2, 0.3] {
            tx.send(DecodedMessage::new(MessageHeader::default(), report(value)))
                .await
                .unwrap();
        }
        drop(tx);

        assert_eq!(app.run(transport).await.unwrap(), 3);

        // 默认队列长度为 1，只保留最新一条
        let mut last = None;
        loop {
            match rx.try_recv() {
                Ok(OutgoingMessage::EkfStatus(status)) => last = Some(status.velocity_variance),
                Err(tokio::sync::broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert_eq!(last, Some(0.3));
    }
}

// 端到端：传输层通道 -> 分发 -> 总线订阅者 -> 编码
#[cfg(test)]
mod end_to_end_tests {
    use mavbridge_core::App;
    use mavbridge_plugins::EkfStatusPlugin;
    use mavbridge_protocol::{
        DecodedMessage, EkfStatus, EkfStatusReport, FixedClock, Heartbeat, MessageHeader,
        OutgoingMessage, Stamp,
    };
    use std::sync::Arc;
    use tokio::sync::mpsc;

    const TOPIC: &str = "ekf_status/ekf_status";

    fn sample_report() -> EkfStatusReport {
        EkfStatusReport {
            velocity_variance: 0.1,
            pos_horiz_variance: 0.2,
            pos_vert_variance: 0.3,
            compass_variance: 0.4,
            terrain_alt_variance: 0.5,
            airspeed_variance: 0.6,
        }
    }

    fn app_with_clock(stamp: Stamp) -> App {
        let mut app = App::new()
            .set_clock(Arc::new(FixedClock(stamp)))
            .add_plugin(EkfStatusPlugin::new())
            .unwrap();
        app.initialize().unwrap();
        app
    }

    #[tokio::test]
    async fn test_transport_to_subscriber() {
        let stamp = Stamp::new(1_700_000_000, 123);
        let app = app_with_clock(stamp);
        let mut rx = app.bus().unwrap().subscribe(TOPIC).unwrap();

        let (tx, transport) = mpsc::channel(4);
        let header = MessageHeader::new(1, 1, 9);
        tx.send(DecodedMessage::new(header, Heartbeat::default()))
            .await
            .unwrap();
        tx.send(DecodedMessage::new(header, sample_report()))
            .await
            .unwrap();
        drop(tx);

        assert_eq!(app.run(transport).await.unwrap(), 2);

        let received = rx.recv().await.unwrap();
        let OutgoingMessage::EkfStatus(status) = &received;
        assert_eq!(status.velocity_variance, 0.1);
        assert_eq!(status.airspeed_variance, 0.6);
        assert_eq!(status.header.as_ref().unwrap().stamp(), stamp);
        assert!(rx.try_recv().is_err());

        // 总线上的消息可以编码后交给外部中间件
        let bytes = received.encode_to_bytes().unwrap();
        let decoded = OutgoingMessage::decode(EkfStatus::TYPE_NAME, bytes).unwrap();
        assert_eq!(decoded, received);
    }

    #[test]
    fn test_same_input_same_output() {
        let app = app_with_clock(Stamp::new(5, 0));
        let bus = app.bus().unwrap();
        let mut first = bus.subscribe(TOPIC).unwrap();
        let mut second = bus.subscribe(TOPIC).unwrap();

        let msg = DecodedMessage::new(MessageHeader::default(), sample_report());
        assert_eq!(app.dispatch(&msg).unwrap(), 1);

        assert_eq!(first.try_recv().unwrap(), second.try_recv().unwrap());
    }
}
