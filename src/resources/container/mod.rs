//! The container catalog.

mod compare;

use std::collections::BTreeMap;

use crate::diff::{Catalog, Defaults, FlagStyle, ParamSpec};
use crate::normalize::Mode;
use crate::state::{LiveState, ParamValue};
use crate::version::{EngineVersion, VersionGate};

use super::ResourceKind;

const LIST: Mode = Mode::FlagList { lowercase: false };

/// Every container parameter, in alphabetical order.
const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("annotation")
        .flag("--annotation", FlagStyle::Pairs('='))
        .custom(compare::annotation),
    ParamSpec::new("authfile").flag("--authfile", FlagStyle::Value),
    ParamSpec::new("blkio_weight")
        .flag("--blkio-weight", FlagStyle::Value)
        .field(&["hostconfig", "blkioweight"], Mode::Scalar),
    ParamSpec::new("blkio_weight_device")
        .flag("--blkio-weight-device", FlagStyle::Pairs(':'))
        .custom(compare::blkio_weight_device),
    ParamSpec::new("cap_add")
        .aliases(&["capabilities"])
        .flag("--cap-add", FlagStyle::Repeated)
        .custom(compare::cap_add),
    ParamSpec::new("cap_drop")
        .flag("--cap-drop", FlagStyle::Repeated)
        .custom(compare::cap_drop),
    ParamSpec::new("cgroup_parent")
        .flag("--cgroup-parent", FlagStyle::Value)
        .field(&["hostconfig", "cgroupparent"], Mode::Path),
    ParamSpec::new("cgroupns")
        .flag("--cgroupns", FlagStyle::Equals)
        .command_field(&["--cgroupns"], Mode::Scalar)
        .gate(VersionGate::since("1.6.2")),
    ParamSpec::new("cgroups")
        .flag("--cgroups", FlagStyle::Equals)
        .custom(compare::cgroups)
        .gate(VersionGate::since("1.6.0"))
        .excluded(),
    ParamSpec::new("cidfile")
        .flag("--cidfile", FlagStyle::Value)
        .field(&["hostconfig", "containeridfile"], Mode::Path)
        .excluded(),
    ParamSpec::new("cmd_args").raw().non_idempotent(),
    ParamSpec::new("command").custom(compare::command),
    ParamSpec::new("conmon_pidfile")
        .flag("--conmon-pidfile", FlagStyle::Value)
        .custom(compare::conmon_pidfile)
        .excluded(),
    ParamSpec::new("cpu_period")
        .flag("--cpu-period", FlagStyle::Value)
        .field(&["hostconfig", "cpuperiod"], Mode::Scalar),
    ParamSpec::new("cpu_rt_period")
        .flag("--cpu-rt-period", FlagStyle::Value)
        .field(&["hostconfig", "cpurealtimeperiod"], Mode::Scalar),
    ParamSpec::new("cpu_rt_runtime")
        .flag("--cpu-rt-runtime", FlagStyle::Value)
        .field(&["hostconfig", "cpurealtimeruntime"], Mode::Scalar),
    ParamSpec::new("cpu_shares")
        .flag("--cpu-shares", FlagStyle::Value)
        .field(&["hostconfig", "cpushares"], Mode::Scalar),
    ParamSpec::new("cpus")
        .flag("--cpus", FlagStyle::Value)
        .custom(compare::cpus),
    ParamSpec::new("cpuset_cpus")
        .flag("--cpuset-cpus", FlagStyle::Value)
        .field(&["hostconfig", "cpusetcpus"], Mode::Scalar),
    ParamSpec::new("cpuset_mems")
        .flag("--cpuset-mems", FlagStyle::Value)
        .field(&["hostconfig", "cpusetmems"], Mode::Scalar),
    ParamSpec::new("detach")
        .flag("--detach", FlagStyle::Equals)
        .boolean(),
    ParamSpec::new("detach_keys").flag("--detach-keys", FlagStyle::Value),
    ParamSpec::new("device")
        .flag("--device", FlagStyle::Repeated)
        .custom(compare::device),
    ParamSpec::new("device_read_bps")
        .flag("--device-read-bps", FlagStyle::Repeated)
        .custom(compare::device_read_bps),
    ParamSpec::new("device_read_iops")
        .flag("--device-read-iops", FlagStyle::Repeated)
        .custom(compare::device_read_iops),
    ParamSpec::new("device_write_bps")
        .flag("--device-write-bps", FlagStyle::Repeated)
        .custom(compare::device_write_bps),
    ParamSpec::new("device_write_iops")
        .flag("--device-write-iops", FlagStyle::Repeated)
        .custom(compare::device_write_iops),
    ParamSpec::new("dns")
        .aliases(&["dns_servers"])
        .flag("--dns", FlagStyle::Joined)
        .field(&["hostconfig", "dns"], LIST),
    ParamSpec::new("dns_option")
        .aliases(&["dns_opts"])
        .flag("--dns-option", FlagStyle::Value)
        .field(&["hostconfig", "dnsoptions"], LIST),
    ParamSpec::new("dns_search")
        .aliases(&["dns_search_domains"])
        .flag("--dns-search", FlagStyle::Value)
        .field(&["hostconfig", "dnssearch"], LIST),
    ParamSpec::new("entrypoint")
        .flag("--entrypoint", FlagStyle::Value)
        .custom(compare::entrypoint),
    ParamSpec::new("env")
        .flag("--env", FlagStyle::Pairs('='))
        .custom(compare::env),
    ParamSpec::new("env_file")
        .flag("--env-file", FlagStyle::Repeated)
        .non_idempotent(),
    ParamSpec::new("env_host")
        .flag("--env-host", FlagStyle::Equals)
        .boolean()
        .custom(compare::env_host)
        .gate(VersionGate::since("1.5.0")),
    ParamSpec::new("etc_hosts")
        .aliases(&["add_hosts"])
        .flag("--add-host", FlagStyle::Pairs(':'))
        .custom(compare::etc_hosts),
    ParamSpec::new("expose")
        .aliases(&["exposed", "exposed_ports"])
        .flag("--expose", FlagStyle::Repeated)
        .custom(compare::expose),
    ParamSpec::new("gidmap")
        .flag("--gidmap", FlagStyle::Repeated)
        .command_field(&["--gidmap"], LIST),
    ParamSpec::new("group_add")
        .aliases(&["groups"])
        .flag("--group-add", FlagStyle::Repeated)
        .field(&["hostconfig", "groupadd"], LIST),
    ParamSpec::new("healthcheck")
        .flag("--health-cmd", FlagStyle::Value)
        .custom(compare::healthcheck),
    ParamSpec::new("healthcheck_interval")
        .flag("--health-interval", FlagStyle::Value)
        .command_field(&["--health-interval", "--healthcheck-interval"], Mode::Scalar),
    ParamSpec::new("healthcheck_retries")
        .flag("--health-retries", FlagStyle::Value)
        .command_field(&["--health-retries", "--healthcheck-retries"], Mode::Scalar),
    ParamSpec::new("healthcheck_start_period")
        .flag("--health-start-period", FlagStyle::Value)
        .command_field(
            &["--health-start-period", "--healthcheck-start-period"],
            Mode::Scalar,
        ),
    ParamSpec::new("healthcheck_timeout")
        .flag("--health-timeout", FlagStyle::Value)
        .command_field(&["--health-timeout", "--healthcheck-timeout"], Mode::Scalar),
    ParamSpec::new("hostname")
        .flag("--hostname", FlagStyle::Value)
        .field(&["config", "hostname"], Mode::Scalar),
    ParamSpec::new("http_proxy")
        .flag("--http-proxy", FlagStyle::Equals)
        .boolean()
        .command_field(&["--http-proxy"], Mode::BoolString),
    ParamSpec::new("image").custom(compare::image),
    ParamSpec::new("image_strict").boolean(),
    ParamSpec::new("image_volume")
        .flag("--image-volume", FlagStyle::Value)
        .command_field(&["--image-volume"], Mode::Lowercase),
    ParamSpec::new("init")
        .flag("--init", FlagStyle::Switch)
        .boolean()
        .command_field(&["--init"], Mode::BoolString),
    ParamSpec::new("init_path")
        .flag("--init-path", FlagStyle::Value)
        .command_field(&["--init-path"], Mode::Path),
    ParamSpec::new("interactive")
        .flag("--interactive", FlagStyle::Equals)
        .boolean()
        .command_field(&["--interactive", "-i"], Mode::BoolString),
    ParamSpec::new("ip")
        .flag("--ip", FlagStyle::Value)
        .command_field(&["--ip"], Mode::Scalar),
    ParamSpec::new("ipc")
        .aliases(&["ipc_mode"])
        .flag("--ipc", FlagStyle::Value)
        .custom(compare::ipc),
    ParamSpec::new("kernel_memory")
        .flag("--kernel-memory", FlagStyle::Value)
        .field(&["hostconfig", "kernelmemory"], Mode::ByteSize),
    ParamSpec::new("label")
        .aliases(&["labels"])
        .flag("--label", FlagStyle::Pairs('='))
        .custom(compare::label),
    ParamSpec::new("label_file")
        .flag("--label-file", FlagStyle::Value)
        .non_idempotent(),
    ParamSpec::new("log_driver")
        .flag("--log-driver", FlagStyle::Value)
        .field(&["hostconfig", "logconfig", "type"], Mode::Lowercase),
    ParamSpec::new("log_level")
        .flag("--log-level", FlagStyle::Value)
        .custom(compare::log_level),
    ParamSpec::new("log_opt")
        .aliases(&["log_options"])
        .flag("--log-opt", FlagStyle::LogOpt)
        .custom(compare::log_opt),
    ParamSpec::new("mac_address")
        .flag("--mac-address", FlagStyle::Value)
        .field(&["networksettings", "macaddress"], Mode::Lowercase),
    ParamSpec::new("memory")
        .flag("--memory", FlagStyle::Value)
        .field(&["hostconfig", "memory"], Mode::ByteSize),
    ParamSpec::new("memory_reservation")
        .flag("--memory-reservation", FlagStyle::Value)
        .field(&["hostconfig", "memoryreservation"], Mode::ByteSize),
    ParamSpec::new("memory_swap")
        .flag("--memory-swap", FlagStyle::Value)
        .custom(compare::memory_swap),
    ParamSpec::new("memory_swappiness")
        .flag("--memory-swappiness", FlagStyle::Value)
        .field(&["hostconfig", "memoryswappiness"], Mode::Scalar),
    ParamSpec::new("mount").flag("--mount", FlagStyle::Repeated),
    ParamSpec::new("network")
        .aliases(&["net", "network_mode"])
        .flag("--network", FlagStyle::Joined)
        .custom(compare::network),
    ParamSpec::new("no_hosts")
        .flag("--no-hosts", FlagStyle::Equals)
        .boolean()
        .custom(compare::no_hosts),
    ParamSpec::new("oom_kill_disable")
        .flag("--oom-kill-disable", FlagStyle::Equals)
        .boolean()
        .field(&["hostconfig", "oomkilldisable"], Mode::BoolString),
    ParamSpec::new("oom_score_adj")
        .flag("--oom-score-adj", FlagStyle::Value)
        .field(&["hostconfig", "oomscoreadj"], Mode::Scalar),
    ParamSpec::new("pid")
        .aliases(&["pid_mode"])
        .flag("--pid", FlagStyle::Value)
        .field(&["hostconfig", "pidmode"], Mode::Scalar),
    ParamSpec::new("pids_limit")
        .flag("--pids-limit", FlagStyle::Value)
        .field(&["hostconfig", "pidslimit"], Mode::Scalar),
    ParamSpec::new("pod")
        .flag("--pod", FlagStyle::Value)
        .command_field(&["--pod"], Mode::Scalar),
    ParamSpec::new("privileged")
        .flag("--privileged", FlagStyle::Equals)
        .boolean()
        .field(&["hostconfig", "privileged"], Mode::BoolString),
    ParamSpec::new("publish")
        .aliases(&["ports", "published", "published_ports"])
        .flag("--publish", FlagStyle::Repeated)
        .custom(compare::publish),
    ParamSpec::new("publish_all")
        .flag("--publish-all", FlagStyle::Equals)
        .boolean()
        .command_field(&["--publish-all", "-P"], Mode::BoolString),
    ParamSpec::new("read_only")
        .flag("--read-only", FlagStyle::Equals)
        .boolean()
        .field(&["hostconfig", "readonlyrootfs"], Mode::BoolString),
    ParamSpec::new("read_only_tmpfs")
        .flag("--read-only-tmpfs", FlagStyle::Equals)
        .boolean()
        .command_field(&["--read-only-tmpfs"], Mode::BoolString),
    ParamSpec::new("restart_policy")
        .flag("--restart", FlagStyle::Equals)
        .command_field(&["--restart"], Mode::Scalar),
    ParamSpec::new("rm")
        .aliases(&["remove", "auto_remove"])
        .flag("--rm", FlagStyle::Switch)
        .boolean()
        .field(&["hostconfig", "autoremove"], Mode::BoolString),
    ParamSpec::new("rootfs")
        .flag("--rootfs", FlagStyle::Equals)
        .boolean()
        .command_field(&["--rootfs"], Mode::BoolString),
    ParamSpec::new("sdnotify")
        .flag("--sdnotify", FlagStyle::Equals)
        .command_field(&["--sdnotify"], Mode::Lowercase)
        .excluded(),
    ParamSpec::new("security_opt")
        .flag("--security-opt", FlagStyle::Repeated)
        .custom(compare::security_opt),
    ParamSpec::new("shm_size")
        .flag("--shm-size", FlagStyle::Value)
        .field(&["hostconfig", "shmsize"], Mode::ByteSize),
    ParamSpec::new("sig_proxy")
        .flag("--sig-proxy", FlagStyle::Equals)
        .boolean()
        .command_field(&["--sig-proxy"], Mode::BoolString),
    ParamSpec::new("stop_signal")
        .flag("--stop-signal", FlagStyle::Value)
        .custom(compare::stop_signal),
    ParamSpec::new("stop_timeout")
        .flag("--stop-timeout", FlagStyle::Value)
        .field(&["config", "stoptimeout"], Mode::Scalar),
    ParamSpec::new("subgidname")
        .flag("--subgidname", FlagStyle::Value)
        .command_field(&["--subgidname"], Mode::Scalar),
    ParamSpec::new("subuidname")
        .flag("--subuidname", FlagStyle::Value)
        .command_field(&["--subuidname"], Mode::Scalar),
    ParamSpec::new("sysctl")
        .flag("--sysctl", FlagStyle::Pairs('='))
        .command_field(&["--sysctl"], Mode::KeyValue),
    ParamSpec::new("systemd")
        .flag("--systemd", FlagStyle::Equals)
        .command_field(&["--systemd"], Mode::Lowercase),
    ParamSpec::new("tmpfs")
        .flag("--tmpfs", FlagStyle::Pairs(':'))
        .custom(compare::tmpfs),
    ParamSpec::new("tty")
        .flag("--tty", FlagStyle::Equals)
        .boolean()
        .field(&["config", "tty"], Mode::BoolString),
    ParamSpec::new("uidmap")
        .flag("--uidmap", FlagStyle::Repeated)
        .command_field(&["--uidmap"], LIST),
    ParamSpec::new("ulimit")
        .aliases(&["ulimits"])
        .flag("--ulimit", FlagStyle::Repeated)
        .command_field(&["--ulimit"], LIST),
    ParamSpec::new("user")
        .flag("--user", FlagStyle::Value)
        .field(&["config", "user"], Mode::Scalar),
    ParamSpec::new("userns")
        .aliases(&["userns_mode"])
        .flag("--userns", FlagStyle::Value)
        .command_field(&["--userns"], Mode::Scalar),
    ParamSpec::new("uts")
        .flag("--uts", FlagStyle::Value)
        .custom(compare::uts),
    ParamSpec::new("volume")
        .aliases(&["volumes"])
        .flag("--volume", FlagStyle::Repeated)
        .custom(compare::volume),
    ParamSpec::new("volumes_from")
        .flag("--volumes-from", FlagStyle::Repeated)
        .field(&["hostconfig", "volumesfrom"], LIST),
    ParamSpec::new("workdir")
        .aliases(&["working_dir"])
        .flag("--workdir", FlagStyle::Value)
        .field(&["config", "workingdir"], Mode::Path),
];

fn image_default(live: &LiveState, key: &str, fallback: &str) -> ParamValue {
    live.image()
        .at(&["config", key])
        .as_str()
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .into()
}

fn defaults(version: &EngineVersion, live: &LiveState) -> Defaults {
    let none = || ParamValue::List(Vec::new());
    let mut defaults = Defaults::from([
        ("blkio_weight", ParamValue::Int(0)),
        ("cgroups", ParamValue::from("default")),
        ("cidfile", ParamValue::from("")),
        ("cpu_period", ParamValue::Int(0)),
        ("cpu_rt_period", ParamValue::Int(0)),
        ("cpu_rt_runtime", ParamValue::Int(0)),
        ("cpu_shares", ParamValue::Int(0)),
        ("cpus", ParamValue::from("0")),
        ("cpuset_cpus", ParamValue::from("")),
        ("cpuset_mems", ParamValue::from("")),
        ("device", none()),
        ("env_host", ParamValue::Bool(false)),
        ("etc_hosts", ParamValue::Map(BTreeMap::new())),
        ("group_add", none()),
        ("ipc", ParamValue::from("")),
        ("memory", ParamValue::from("0")),
        ("memory_reservation", ParamValue::from("0")),
        ("memory_swap", ParamValue::from("0")),
        ("no_hosts", ParamValue::Bool(false)),
        ("oom_score_adj", ParamValue::Int(0)),
        ("pid", ParamValue::from("")),
        ("privileged", ParamValue::Bool(false)),
        ("rm", ParamValue::Bool(false)),
        ("security_opt", none()),
        ("stop_signal", image_default(live, "stopsignal", "15")),
        ("tty", ParamValue::Bool(false)),
        ("user", image_default(live, "user", "")),
        ("uts", ParamValue::from("")),
        ("volumes_from", none()),
        ("workdir", image_default(live, "workingdir", "/")),
    ]);
    if version.in_series(1, 8) {
        defaults.insert("cpu_shares", ParamValue::Int(1024));
    }
    if version.at_least(2, 0, 0) {
        for namespace in ["ipc", "pid", "uts"] {
            defaults.insert(namespace, ParamValue::from("private"));
        }
        let network = if version.at_least(5, 0, 0) {
            "pasta"
        } else {
            "slirp4netns"
        };
        defaults.insert("network", ParamValue::from(vec![network.to_owned()]));
    }
    defaults
}

/// The container catalog.
pub(super) fn catalog() -> Catalog {
    Catalog::new(ResourceKind::Container, PARAMS, defaults)
}
