// Opaque counter_data types according to https://sflow.org/SFLOW-STRUCTS5.txt
pub const COUNTER_TYPE_IF: u32 = 1;
pub const COUNTER_TYPE_ETH: u32 = 2;
pub const COUNTER_TYPE_TOKENRING: u32 = 3;
pub const COUNTER_TYPE_VG: u32 = 4;
pub const COUNTER_TYPE_VLAN: u32 = 5;
pub const COUNTER_TYPE_CPU: u32 = 1001;

// According to https://sflow.org/sflow_host.txt
pub const COUNTER_TYPE_HOST_CPU: u32 = 2003;
pub const COUNTER_TYPE_HOST_MEMORY: u32 = 2004;
pub const COUNTER_TYPE_HOST_DISK_IO: u32 = 2005;
pub const COUNTER_TYPE_HOST_NET_IO: u32 = 2006;

fixed_record! {
    /// Generic interface counters, see RFC 2233.
    pub struct IfCounters(COUNTER_TYPE_IF, "GenericInterfaceCounters") {
        pub if_index: u32,
        pub if_type: u32,
        pub if_speed: u64,
        /// 0 = unknown, 1 = full-duplex, 2 = half-duplex, 3 = in, 4 = out
        pub if_direction: u32,
        /// bit 0 is ifAdminStatus, bit 1 is ifOperStatus
        pub if_status: u32,
        pub if_in_octets: u64,
        pub if_in_ucast_pkts: u32,
        pub if_in_multicast_pkts: u32,
        pub if_in_broadcast_pkts: u32,
        pub if_in_discards: u32,
        pub if_in_errors: u32,
        pub if_in_unknown_protos: u32,
        pub if_out_octets: u64,
        pub if_out_ucast_pkts: u32,
        pub if_out_multicast_pkts: u32,
        pub if_out_broadcast_pkts: u32,
        pub if_out_discards: u32,
        pub if_out_errors: u32,
        pub if_promiscuous_mode: u32,
    }
}

fixed_record! {
    /// Ethernet interface counters, see RFC 2358.
    pub struct EthernetCounters(COUNTER_TYPE_ETH, "EthernetCounters") {
        pub dot3stats_alignment_errors: u32,
        pub dot3stats_fcs_errors: u32,
        pub dot3stats_single_collision_frames: u32,
        pub dot3stats_multiple_collision_frames: u32,
        pub dot3stats_sqe_test_errors: u32,
        pub dot3stats_deferred_transmissions: u32,
        pub dot3stats_late_collisions: u32,
        pub dot3stats_excessive_collisions: u32,
        pub dot3stats_internal_mac_transmit_errors: u32,
        pub dot3stats_carrier_sense_errors: u32,
        pub dot3stats_frame_too_longs: u32,
        pub dot3stats_internal_mac_receive_errors: u32,
        pub dot3stats_symbol_errors: u32,
    }
}

fixed_record! {
    /// Token ring counters, see RFC 1748.
    pub struct TokenRingCounters(COUNTER_TYPE_TOKENRING, "TokenRingCounters") {
        pub dot5stats_line_errors: u32,
        pub dot5stats_burst_errors: u32,
        pub dot5stats_ac_errors: u32,
        pub dot5stats_abort_trans_errors: u32,
        pub dot5stats_internal_errors: u32,
        pub dot5stats_lost_frame_errors: u32,
        pub dot5stats_receive_congestions: u32,
        pub dot5stats_frame_copied_errors: u32,
        pub dot5stats_token_errors: u32,
        pub dot5stats_soft_errors: u32,
        pub dot5stats_hard_errors: u32,
        pub dot5stats_signal_loss: u32,
        pub dot5stats_transmit_beacons: u32,
        pub dot5stats_recoverys: u32,
        pub dot5stats_lobe_wires: u32,
        pub dot5stats_removes: u32,
        pub dot5stats_singles: u32,
        pub dot5stats_freq_errors: u32,
    }
}

fixed_record! {
    /// 100 BaseVG interface counters, see RFC 2020.
    pub struct VgCounters(COUNTER_TYPE_VG, "VgCounters") {
        pub dot12_in_high_priority_frames: u32,
        pub dot12_in_high_priority_octets: u64,
        pub dot12_in_norm_priority_frames: u32,
        pub dot12_in_norm_priority_octets: u64,
        pub dot12_in_ipm_errors: u32,
        pub dot12_in_oversize_frame_errors: u32,
        pub dot12_in_data_errors: u32,
        pub dot12_in_null_addressed_frames: u32,
        pub dot12_out_high_priority_frames: u32,
        pub dot12_out_high_priority_octets: u64,
        pub dot12_transition_into_trainings: u32,
        pub dot12_hc_in_high_priority_octets: u64,
        pub dot12_hc_in_norm_priority_octets: u64,
        pub dot12_hc_out_high_priority_octets: u64,
    }
}

fixed_record! {
    pub struct VlanCounters(COUNTER_TYPE_VLAN, "VlanCounters") {
        pub vlan_id: u32,
        pub octets: u64,
        pub ucast_pkts: u32,
        pub multicast_pkts: u32,
        pub broadcast_pkts: u32,
        pub discards: u32,
    }
}

fixed_record! {
    /// Processor information of a switch or router.
    pub struct ProcessorCounters(COUNTER_TYPE_CPU, "ProcessorCounters") {
        /// 5 second average CPU utilization, in percent
        pub cpu_5s: u32,
        pub cpu_1m: u32,
        pub cpu_5m: u32,
        /// bytes
        pub total_memory: u64,
        pub free_memory: u64,
    }
}

fixed_record! {
    pub struct HostCPU(COUNTER_TYPE_HOST_CPU, "HostCPUCounters") {
        /// 1 minute load avg., -1.0 = unknown
        pub load_one: f32,
        /// 5 minute load avg., -1.0 = unknown
        pub load_five: f32,
        /// 15 minute load avg., -1.0 = unknown
        pub load_fifteen: f32,
        /// total number of running processes
        pub proc_run: u32,
        /// total number of processes
        pub proc_total: u32,
        /// number of CPUs
        pub cpu_num: u32,
        /// speed in MHz of CPU
        pub cpu_speed: u32,
        /// seconds since last reboot
        pub uptime: u32,
        /// user time (ms)
        pub cpu_user: u32,
        /// nice time (ms)
        pub cpu_nice: u32,
        /// system time (ms)
        pub cpu_system: u32,
        /// idle time (ms)
        pub cpu_idle: u32,
        /// time waiting for I/O to complete (ms)
        pub cpu_wio: u32,
        /// time servicing interrupts (ms)
        pub cpu_intr: u32,
        /// time servicing soft interrupts (ms)
        pub cpu_sintr: u32,
        /// interrupt count
        pub interrupts: u32,
        /// context switch count
        pub contexts: u32,
        pub cpu_steal: u32,
        pub cpu_guest: u32,
        pub cpu_guest_nice: u32,
    }
}

fixed_record! {
    pub struct HostMemory(COUNTER_TYPE_HOST_MEMORY, "HostMemoryCounters") {
        pub mem_total: u64,
        pub mem_free: u64,
        pub mem_shared: u64,
        pub mem_buffers: u64,
        pub mem_cached: u64,
        pub swap_total: u64,
        pub swap_free: u64,
        pub page_in: u32,
        pub page_out: u32,
        pub swap_in: u32,
        pub swap_out: u32,
    }
}

fixed_record! {
    pub struct HostDiskIO(COUNTER_TYPE_HOST_DISK_IO, "HostDiskCounters") {
        /// total disk size in bytes
        pub disk_total: u64,
        /// total disk free in bytes
        pub disk_free: u64,
        /// utilization of most utilized partition, in hundredths of a percent
        pub part_max_used: u32,
        pub reads: u32,
        pub bytes_read: u64,
        /// ms
        pub read_time: u32,
        pub writes: u32,
        pub bytes_written: u64,
        /// ms
        pub write_time: u32,
    }
}

fixed_record! {
    pub struct HostNetIO(COUNTER_TYPE_HOST_NET_IO, "HostNetCounters") {
        pub bytes_in: u64,
        pub pkts_in: u32,
        pub errs_in: u32,
        pub drops_in: u32,
        pub bytes_out: u64,
        pub pkts_out: u32,
        pub errs_out: u32,
        pub drops_out: u32,
    }
}

record_family! {
    /// Records carried by counter samples.
    pub enum CounterRecord {
        #[serde(rename = "if_counters")]
        IfCounters(IfCounters),
        #[serde(rename = "ethernet_counters")]
        EthernetCounters(EthernetCounters),
        #[serde(rename = "token_ring_counters")]
        TokenRingCounters(TokenRingCounters),
        #[serde(rename = "vg_counters")]
        VgCounters(VgCounters),
        #[serde(rename = "vlan_counters")]
        VlanCounters(VlanCounters),
        #[serde(rename = "processor_counters")]
        ProcessorCounters(ProcessorCounters),
        #[serde(rename = "host_cpu")]
        HostCPU(HostCPU),
        #[serde(rename = "host_memory")]
        HostMemory(HostMemory),
        #[serde(rename = "host_disk_io")]
        HostDiskIO(HostDiskIO),
        #[serde(rename = "host_net_io")]
        HostNetIO(HostNetIO),
    }
}
